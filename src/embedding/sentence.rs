use candle_core::{Device, Tensor};
use tokenizers::Tokenizer;
use tracing::{debug, info, warn};

use crate::hashing::hash_to_u64;

use super::bert::BertSentenceModel;
use super::config::EmbedderConfig;
use super::device::select_device;
use super::error::EmbeddingError;
use super::utils::{l2_normalize, load_tokenizer};
use super::Embedder;

enum EmbedderBackend {
    Model {
        model: BertSentenceModel,
        tokenizer: Tokenizer,
        device: Device,
    },
    Stub,
}

/// Sentence embedder for corpus passages and questions (supports stub mode).
///
/// The stub hashes lowercase word tokens into `embedding_dim` buckets and normalizes the
/// counts, so texts sharing vocabulary land close together under cosine similarity.
pub struct SentenceEmbedder {
    backend: EmbedderBackend,
    embedding_dim: usize,
}

impl std::fmt::Debug for SentenceEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentenceEmbedder")
            .field(
                "backend",
                &match &self.backend {
                    EmbedderBackend::Model { device, .. } => format!("Model({:?})", device),
                    EmbedderBackend::Stub => "Stub".to_string(),
                },
            )
            .field("embedding_dim", &self.embedding_dim)
            .finish()
    }
}

impl SentenceEmbedder {
    pub fn load(config: EmbedderConfig) -> Result<Self, EmbeddingError> {
        config.validate()?;

        let Some(model_dir) = config.model_path.as_ref() else {
            warn!("Sentence embedder running in STUB mode");
            return Ok(Self::stub(config.embedding_dim));
        };

        for required in ["config.json", "model.safetensors", "tokenizer.json"] {
            if !model_dir.join(required).is_file() {
                return Err(EmbeddingError::ModelNotFound {
                    path: model_dir.join(required),
                });
            }
        }

        let device = select_device();
        debug!(?device, "Selected compute device for embedder");

        let model = BertSentenceModel::load(model_dir, &device).map_err(|e| {
            EmbeddingError::ModelLoadFailed {
                reason: format!("Failed to load BERT model: {}", e),
            }
        })?;

        let tokenizer = load_tokenizer(model_dir, config.max_seq_len).map_err(|e| {
            EmbeddingError::TokenizationFailed {
                reason: format!("Failed to load tokenizer: {}", e),
            }
        })?;

        let embedding_dim = model.hidden_size();
        if embedding_dim != config.embedding_dim {
            warn!(
                configured = config.embedding_dim,
                model = embedding_dim,
                "Configured embedding_dim differs from model hidden size; using model's"
            );
        }

        info!(
            model_path = %model_dir.display(),
            embedding_dim,
            max_seq_len = config.max_seq_len,
            "Sentence embedding model loaded"
        );

        Ok(Self {
            backend: EmbedderBackend::Model {
                model,
                tokenizer,
                device,
            },
            embedding_dim,
        })
    }

    pub fn stub(embedding_dim: usize) -> Self {
        Self {
            backend: EmbedderBackend::Stub,
            embedding_dim: embedding_dim.max(1),
        }
    }

    pub fn is_stub(&self) -> bool {
        matches!(self.backend, EmbedderBackend::Stub)
    }

    fn embed_with_model(
        model: &BertSentenceModel,
        tokenizer: &Tokenizer,
        device: &Device,
        text: &str,
    ) -> Result<Vec<f32>, EmbeddingError> {
        let encoding =
            tokenizer
                .encode(text, true)
                .map_err(|e| EmbeddingError::TokenizationFailed {
                    reason: e.to_string(),
                })?;

        let input_ids = Tensor::new(encoding.get_ids(), device)?.unsqueeze(0)?;
        let token_type_ids = Tensor::new(encoding.get_type_ids(), device)?.unsqueeze(0)?;
        let attention_mask = Tensor::new(encoding.get_attention_mask(), device)?.unsqueeze(0)?;

        let pooled = model.forward_pooled(&input_ids, &token_type_ids, &attention_mask)?;
        Ok(pooled.squeeze(0)?.to_vec1::<f32>()?)
    }

    fn embed_stub(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.embedding_dim];

        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let bucket = hash_to_u64(token.to_lowercase().as_bytes()) % self.embedding_dim as u64;
            vector[bucket as usize] += 1.0;
        }

        l2_normalize(&mut vector);
        vector
    }
}

impl Embedder for SentenceEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        match &self.backend {
            EmbedderBackend::Model {
                model,
                tokenizer,
                device,
            } => Self::embed_with_model(model, tokenizer, device, text),
            EmbedderBackend::Stub => Ok(self.embed_stub(text)),
        }
    }

    fn embedding_dim(&self) -> usize {
        self.embedding_dim
    }
}
