use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("provider error ({model}): {message}")]
    Provider { model: String, message: String },

    #[error("invalid generator configuration: {reason}")]
    InvalidConfig { reason: String },
}
