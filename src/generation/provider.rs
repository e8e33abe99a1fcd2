use genai::Client;
use genai::chat::{ChatMessage, ChatRequest};
use tracing::{debug, warn};

use crate::gate::AnswerContext;

use super::Generator;
use super::error::GenerationError;
use super::prompt::{NO_ANSWER, SYSTEM_PROMPT, render_prompt};

/// Hosted-LLM generator; the provider is inferred by genai from the model name and
/// credentials come from the provider's usual environment variables.
#[derive(Clone)]
pub struct GenaiGenerator {
    client: Client,
    model: String,
}

impl std::fmt::Debug for GenaiGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenaiGenerator")
            .field("model", &self.model)
            .finish()
    }
}

impl GenaiGenerator {
    pub fn new(model: impl Into<String>) -> Result<Self, GenerationError> {
        let model = model.into();
        if model.trim().is_empty() {
            return Err(GenerationError::InvalidConfig {
                reason: "model name cannot be empty".to_string(),
            });
        }

        Ok(Self {
            client: Client::default(),
            model,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn build_request(question: &str, context: &AnswerContext) -> ChatRequest {
        ChatRequest::new(vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(render_prompt(question, context)),
        ])
    }
}

impl Generator for GenaiGenerator {
    async fn generate(
        &self,
        question: &str,
        context: &AnswerContext,
    ) -> Result<String, GenerationError> {
        let request = Self::build_request(question, context);

        debug!(
            model = %self.model,
            passages = context.len(),
            "Sending generation request"
        );

        let response = self
            .client
            .exec_chat(&self.model, request, None)
            .await
            .map_err(|e| GenerationError::Provider {
                model: self.model.clone(),
                message: e.to_string(),
            })?;

        match response.first_text().map(str::trim) {
            Some(text) if !text.is_empty() => Ok(text.to_string()),
            _ => {
                warn!(model = %self.model, "Provider returned no text");
                Ok(NO_ANSWER.to_string())
            }
        }
    }
}
