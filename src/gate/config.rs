use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_MAX_CONTEXT_CHUNKS, DEFAULT_MIN_CANDIDATES, DEFAULT_SCORE_THRESHOLD,
};

use super::error::GateError;

/// Thresholds for [`decide`](super::decide) and [`assemble`](super::assemble).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GateConfig {
    /// Candidates required before the corpus alone is considered sufficient.
    pub min_candidates: usize,

    /// Minimum similarity of the top candidate for a "confident" retrieval.
    pub score_threshold: f32,

    /// Upper bound on assembled passages (corpus and fallback combined).
    pub max_context_chunks: usize,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            min_candidates: DEFAULT_MIN_CANDIDATES,
            score_threshold: DEFAULT_SCORE_THRESHOLD,
            max_context_chunks: DEFAULT_MAX_CONTEXT_CHUNKS,
        }
    }
}

impl GateConfig {
    pub fn with_min_candidates(mut self, min_candidates: usize) -> Self {
        self.min_candidates = min_candidates;
        self
    }

    pub fn with_score_threshold(mut self, score_threshold: f32) -> Self {
        self.score_threshold = score_threshold;
        self
    }

    pub fn with_max_context_chunks(mut self, max_context_chunks: usize) -> Self {
        self.max_context_chunks = max_context_chunks;
        self
    }

    /// Rejects a non-finite threshold and a zero context budget. The threshold range is not
    /// checked.
    pub fn validate(&self) -> Result<(), GateError> {
        if !self.score_threshold.is_finite() {
            return Err(GateError::InvalidConfig {
                reason: format!("score_threshold must be finite, got {}", self.score_threshold),
            });
        }

        if self.max_context_chunks == 0 {
            return Err(GateError::InvalidConfig {
                reason: "max_context_chunks must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}
