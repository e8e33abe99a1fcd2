//! General-knowledge fallback consulted when the corpus is weak or empty.

pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod wikipedia;


pub use error::FallbackError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockFallbackSource;
pub use wikipedia::{WikipediaConfig, WikipediaSource};

/// External knowledge lookup.
///
/// Returns passages in relevance order; an empty vec means nothing relevant was found and
/// is not an error.
pub trait FallbackKnowledgeSource: Send + Sync {
    fn lookup(
        &self,
        query: &str,
    ) -> impl std::future::Future<Output = Result<Vec<String>, FallbackError>> + Send;
}
