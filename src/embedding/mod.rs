//! Text embedding.
//!
//! - [`SentenceEmbedder`] runs a BERT-family sentence model locally via candle, or a
//!   deterministic feature-hashing stub when no model directory is configured.
//! - [`crate::cache::CachedEmbedder`] memoizes any [`Embedder`] by content hash.

/// Mean-pooled BERT encoder.
pub mod bert;
pub mod config;
/// Device selection (CPU / Metal / CUDA).
pub mod device;
mod error;
pub mod sentence;
/// Tokenizer loading helpers.
pub mod utils;


pub use config::EmbedderConfig;
pub use error::EmbeddingError;
pub use sentence::SentenceEmbedder;

/// Turns text into a fixed-size vector.
///
/// Synchronous on purpose: local inference is CPU/GPU bound. Implementations must be
/// shareable across tasks.
pub trait Embedder: Send + Sync {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    fn embedding_dim(&self) -> usize;
}

impl<E: Embedder + ?Sized> Embedder for std::sync::Arc<E> {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        (**self).embed(text)
    }

    fn embedding_dim(&self) -> usize {
        (**self).embedding_dim()
    }
}
