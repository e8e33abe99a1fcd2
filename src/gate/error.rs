use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum GateError {
    #[error("invalid gate configuration: {reason}")]
    InvalidConfig { reason: String },
}
