//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

use crate::gate::GateError;
use crate::ingest::ChunkerError;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable was set but could not be parsed.
    #[error("invalid value '{value}' for {name}: {reason}")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("top_k must be at least 1")]
    ZeroTopK,

    /// Wikipedia serves a bounded number of intro extracts per request.
    #[error("fallback top_k {top_k} exceeds the Wikipedia extracts limit of {max}")]
    FallbackTopKTooLarge { top_k: usize, max: usize },

    #[error(transparent)]
    Gate(#[from] GateError),

    #[error(transparent)]
    Chunker(#[from] ChunkerError),

    /// Specified path does not exist on the filesystem.
    #[error("path does not exist: {path}")]
    PathNotFound { path: PathBuf },

    /// Path exists but is not a directory (when a directory was expected).
    #[error("path is not a directory: {path}")]
    NotADirectory { path: PathBuf },
}
