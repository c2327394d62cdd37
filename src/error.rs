//! Client error taxonomy

use thiserror::Error;

/// Errors produced by the assistant API client
#[derive(Debug, Error)]
pub enum ClientError {
    /// Backend unreachable or the call timed out
    #[error("Network error: {0}")]
    Network(String),

    /// Backend answered with a non-2xx status
    #[error("Request failed ({status}): {message}")]
    Request { status: u16, message: String },

    /// Rejected locally before any network call
    #[error("Validation error: {0}")]
    Validation(String),

    /// 2xx response whose body did not match the expected shape
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl ClientError {
    pub fn is_network(&self) -> bool {
        matches!(self, ClientError::Network(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ClientError::Validation(_))
    }

    /// HTTP status for request errors
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Request { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else if err.is_timeout() {
            ClientError::Network(format!("request timed out: {}", err))
        } else if let Some(status) = err.status() {
            ClientError::Request {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;
