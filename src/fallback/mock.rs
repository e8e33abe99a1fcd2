use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::FallbackKnowledgeSource;
use super::error::FallbackError;

/// Canned fallback source that records calls and can fail or stall on demand.
#[derive(Debug, Default)]
pub struct MockFallbackSource {
    passages: Vec<String>,
    fail: bool,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockFallbackSource {
    pub fn with_passages<I, S>(passages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            passages: passages.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Sleeps for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl FallbackKnowledgeSource for MockFallbackSource {
    async fn lookup(&self, _query: &str) -> Result<Vec<String>, FallbackError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail {
            return Err(FallbackError::Request {
                reason: "injected failure".to_string(),
            });
        }

        Ok(self.passages.clone())
    }
}
