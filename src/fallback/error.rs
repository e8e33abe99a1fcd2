use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FallbackError {
    #[error("fallback request failed: {reason}")]
    Request { reason: String },

    #[error("fallback source returned HTTP {status}")]
    Status { status: u16 },

    #[error("failed to decode fallback response: {reason}")]
    Decode { reason: String },

    #[error("fallback lookup timed out after {elapsed:?}")]
    Timeout { elapsed: Duration },
}

impl From<reqwest::Error> for FallbackError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FallbackError::Decode {
                reason: err.to_string(),
            }
        } else if let Some(status) = err.status() {
            FallbackError::Status {
                status: status.as_u16(),
            }
        } else {
            FallbackError::Request {
                reason: err.to_string(),
            }
        }
    }
}
