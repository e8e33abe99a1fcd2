use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use super::model::cosine_similarity;
use crate::gate::Candidate;
use crate::vectordb::{PassagePoint, VectorDbError, VectorIndex, WriteConsistency};

const MOCK_COLLECTION: &str = "mock";

/// In-memory [`VectorIndex`] using brute-force cosine similarity.
///
/// Points keep insertion order, so equal scores come back in the order they were stored.
#[derive(Default)]
pub struct MockVectorIndex {
    state: RwLock<MockState>,
    fail_searches: AtomicBool,
}

#[derive(Default)]
struct MockState {
    vector_size: Option<u64>,
    points: Vec<PassagePoint>,
}

impl MockVectorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn point_count(&self) -> usize {
        self.state.read().points.len()
    }

    pub fn has_collection(&self) -> bool {
        self.state.read().vector_size.is_some()
    }

    /// Makes subsequent searches fail with [`VectorDbError::SearchFailed`].
    pub fn set_fail_searches(&self, fail: bool) {
        self.fail_searches.store(fail, Ordering::SeqCst);
    }

    pub fn sources(&self) -> Vec<String> {
        let state = self.state.read();
        let mut sources: Vec<String> = Vec::new();
        for point in &state.points {
            if !sources.contains(&point.source_id) {
                sources.push(point.source_id.clone());
            }
        }
        sources
    }
}

impl VectorIndex for MockVectorIndex {
    async fn ensure_collection(&self, vector_size: u64) -> Result<(), VectorDbError> {
        let mut state = self.state.write();
        state.vector_size.get_or_insert(vector_size);
        Ok(())
    }

    async fn upsert_passages(
        &self,
        points: Vec<PassagePoint>,
        _consistency: WriteConsistency,
    ) -> Result<(), VectorDbError> {
        let mut state = self.state.write();

        let Some(vector_size) = state.vector_size else {
            return Err(VectorDbError::CollectionNotFound {
                collection: MOCK_COLLECTION.to_string(),
            });
        };

        // All-or-nothing: reject the batch before touching stored points.
        if let Some(bad) = points.iter().find(|p| p.vector.len() as u64 != vector_size) {
            return Err(VectorDbError::InvalidDimension {
                expected: vector_size as usize,
                actual: bad.vector.len(),
            });
        }

        for point in points {
            match state.points.iter_mut().find(|p| p.id == point.id) {
                Some(existing) => *existing = point,
                None => state.points.push(point),
            }
        }

        Ok(())
    }

    async fn search(&self, query: Vec<f32>, k: u64) -> Result<Vec<Candidate>, VectorDbError> {
        if self.fail_searches.load(Ordering::SeqCst) {
            return Err(VectorDbError::SearchFailed {
                collection: MOCK_COLLECTION.to_string(),
                message: "injected failure".to_string(),
            });
        }

        let state = self.state.read();

        if state.vector_size.is_none() {
            return Err(VectorDbError::CollectionNotFound {
                collection: MOCK_COLLECTION.to_string(),
            });
        }

        let mut results: Vec<Candidate> = state
            .points
            .iter()
            .map(|p| Candidate {
                text: p.text.clone(),
                source_id: p.source_id.clone(),
                score: cosine_similarity(&query, &p.vector),
            })
            .collect();

        // Stable: ties keep insertion order.
        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        results.truncate(k as usize);
        Ok(results)
    }

    async fn delete_source(&self, source_id: &str) -> Result<(), VectorDbError> {
        let mut state = self.state.write();
        state.points.retain(|p| p.source_id != source_id);
        Ok(())
    }

    async fn delete_stale_chunks(
        &self,
        source_id: &str,
        first_stale: usize,
    ) -> Result<(), VectorDbError> {
        let mut state = self.state.write();
        state
            .points
            .retain(|p| p.source_id != source_id || p.chunk_index < first_stale);
        Ok(())
    }
}
