use thiserror::Error;

use crate::embedding::EmbeddingError;
use crate::fallback::FallbackError;
use crate::generation::GenerationError;
use crate::vectordb::VectorDbError;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("question is empty")]
    EmptyQuestion,

    #[error("embedding service failed: {0}")]
    EmbeddingService(#[from] EmbeddingError),

    #[error("vector index unavailable: {0}")]
    IndexUnavailable(#[from] VectorDbError),

    #[error("fallback lookup failed: {0}")]
    FallbackLookupFailed(#[from] FallbackError),

    #[error("answer generation failed: {0}")]
    GenerationFailed(#[from] GenerationError),

    #[error("cannot ingest '{source_id}': {reason}")]
    Ingest { source_id: String, reason: String },
}

pub type PipelineResult<T> = Result<T, PipelineError>;
