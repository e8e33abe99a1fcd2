//! Answer synthesis from an assembled [`AnswerContext`](crate::gate::AnswerContext).

pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod prompt;
pub mod provider;


pub use error::GenerationError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockGenerator;
pub use prompt::{NO_ANSWER, NO_CONTEXT, SYSTEM_PROMPT, render_prompt};
pub use provider::GenaiGenerator;

use crate::gate::AnswerContext;

/// LLM collaborator.
pub trait Generator: Send + Sync {
    fn generate(
        &self,
        question: &str,
        context: &AnswerContext,
    ) -> impl std::future::Future<Output = Result<String, GenerationError>> + Send;
}
