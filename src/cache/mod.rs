//! In-memory embedding cache.
//!
//! Keys are the BLAKE3 hash of the embedded text, values the vector.

use moka::sync::Cache;
use std::sync::Arc;
use tracing::trace;

use crate::constants::DEFAULT_EMBEDDING_CACHE_CAPACITY;
use crate::embedding::{Embedder, EmbeddingError};
use crate::hashing::hash_text;

/// Wraps an [`Embedder`] and memoizes results by content hash.
pub struct CachedEmbedder<E> {
    inner: E,
    entries: Cache<[u8; 32], Arc<Vec<f32>>>,
}

impl<E: Embedder> CachedEmbedder<E> {
    pub fn new(inner: E) -> Self {
        Self::with_capacity(inner, DEFAULT_EMBEDDING_CACHE_CAPACITY)
    }

    pub fn with_capacity(inner: E, capacity: u64) -> Self {
        Self {
            inner,
            entries: Cache::new(capacity),
        }
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }

    /// Approximate entry count (moka applies inserts lazily).
    pub fn entry_count(&self) -> u64 {
        self.entries.run_pending_tasks();
        self.entries.entry_count()
    }

    pub fn contains(&self, text: &str) -> bool {
        self.entries.contains_key(&hash_text(text))
    }

    pub fn clear(&self) {
        self.entries.invalidate_all();
    }
}

impl<E: Embedder> Embedder for CachedEmbedder<E> {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let key = hash_text(text);

        if let Some(hit) = self.entries.get(&key) {
            trace!(text_len = text.len(), "Embedding cache hit");
            return Ok(hit.as_ref().clone());
        }

        let vector = self.inner.embed(text)?;
        self.entries.insert(key, Arc::new(vector.clone()));
        Ok(vector)
    }

    fn embedding_dim(&self) -> usize {
        self.inner.embedding_dim()
    }
}

impl<E> std::fmt::Debug for CachedEmbedder<E>
where
    E: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedEmbedder")
            .field("inner", &self.inner)
            .field("entries", &self.entries.entry_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingEmbedder {
        calls: AtomicUsize,
    }

    impl Embedder for CountingEmbedder {
        fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![text.len() as f32, 1.0])
        }

        fn embedding_dim(&self) -> usize {
            2
        }
    }

    struct FailingEmbedder;

    impl Embedder for FailingEmbedder {
        fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
            Err(EmbeddingError::InferenceFailed {
                reason: "boom".to_string(),
            })
        }

        fn embedding_dim(&self) -> usize {
            2
        }
    }

    fn counting() -> CachedEmbedder<CountingEmbedder> {
        CachedEmbedder::new(CountingEmbedder {
            calls: AtomicUsize::new(0),
        })
    }

    #[test]
    fn test_repeated_text_hits_cache() {
        let cached = counting();

        let first = cached.embed("hello").unwrap();
        let second = cached.embed("hello").unwrap();

        assert_eq!(first, second);
        assert_eq!(cached.inner().calls.load(Ordering::SeqCst), 1);
        assert!(cached.contains("hello"));
    }

    #[test]
    fn test_distinct_texts_miss() {
        let cached = counting();
        cached.embed("a").unwrap();
        cached.embed("b").unwrap();

        assert_eq!(cached.inner().calls.load(Ordering::SeqCst), 2);
        assert_eq!(cached.entry_count(), 2);
    }

    #[test]
    fn test_clear_forces_recompute() {
        let cached = counting();
        cached.embed("a").unwrap();
        cached.clear();
        cached.embed("a").unwrap();

        assert_eq!(cached.inner().calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_errors_are_not_cached() {
        let cached = CachedEmbedder::new(FailingEmbedder);
        assert!(cached.embed("x").is_err());
        assert!(!cached.contains("x"));
    }

    #[test]
    fn test_dim_passthrough() {
        assert_eq!(counting().embedding_dim(), 2);
    }
}
