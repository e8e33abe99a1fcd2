use qdrant_client::qdrant::{ScoredPoint, Value};
use std::collections::HashMap;

use crate::gate::Candidate;
use crate::hashing::passage_point_id;

pub const PAYLOAD_TEXT: &str = "text";
pub const PAYLOAD_SOURCE_ID: &str = "source_id";
pub const PAYLOAD_CHUNK_INDEX: &str = "chunk_index";
pub const PAYLOAD_INGESTED_AT: &str = "ingested_at";

/// One embedded corpus chunk as stored in the index.
#[derive(Debug, Clone, PartialEq)]
pub struct PassagePoint {
    pub id: u64,
    pub vector: Vec<f32>,
    pub text: String,
    pub source_id: String,
    pub chunk_index: usize,
    /// Unix seconds.
    pub ingested_at: i64,
}

impl PassagePoint {
    /// Builds a point whose id is derived from `(source_id, chunk_index)`.
    pub fn new(
        source_id: impl Into<String>,
        chunk_index: usize,
        text: impl Into<String>,
        vector: Vec<f32>,
    ) -> Self {
        let source_id = source_id.into();
        Self {
            id: passage_point_id(&source_id, chunk_index),
            vector,
            text: text.into(),
            source_id,
            chunk_index,
            ingested_at: 0,
        }
    }

    pub fn with_ingested_at(mut self, ingested_at: i64) -> Self {
        self.ingested_at = ingested_at;
        self
    }

    pub(crate) fn payload(&self) -> HashMap<String, Value> {
        let mut payload: HashMap<String, Value> = HashMap::new();
        payload.insert(PAYLOAD_TEXT.to_string(), self.text.clone().into());
        payload.insert(PAYLOAD_SOURCE_ID.to_string(), self.source_id.clone().into());
        payload.insert(
            PAYLOAD_CHUNK_INDEX.to_string(),
            (self.chunk_index as i64).into(),
        );
        payload.insert(PAYLOAD_INGESTED_AT.to_string(), self.ingested_at.into());
        payload
    }
}

/// Converts a Qdrant hit to a [`Candidate`]; hits without passage text are dropped.
pub fn candidate_from_scored_point(point: ScoredPoint) -> Option<Candidate> {
    let payload = point.payload;

    let text = payload
        .get(PAYLOAD_TEXT)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())?;

    let source_id = payload
        .get(PAYLOAD_SOURCE_ID)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .unwrap_or_default();

    Some(Candidate {
        text,
        source_id,
        score: point.score,
    })
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot_product / (norm_a * norm_b)
    }
}
