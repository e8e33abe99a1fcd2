use parking_lot::Mutex;

use crate::gate::AnswerContext;

use super::Generator;
use super::error::GenerationError;
use super::prompt::render_prompt;

/// Offline generator: answers with a fixed line and keeps the last rendered prompt.
#[derive(Debug, Default)]
pub struct MockGenerator {
    fail: bool,
    last_prompt: Mutex<Option<String>>,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().clone()
    }
}

impl Generator for MockGenerator {
    async fn generate(
        &self,
        question: &str,
        context: &AnswerContext,
    ) -> Result<String, GenerationError> {
        *self.last_prompt.lock() = Some(render_prompt(question, context));

        if self.fail {
            return Err(GenerationError::Provider {
                model: "mock".to_string(),
                message: "injected failure".to_string(),
            });
        }

        Ok(format!(
            "[mock] answered \"{question}\" from {} passage(s)",
            context.len()
        ))
    }
}
