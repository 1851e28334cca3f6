//! Client error types.

use std::time::Duration;
use thiserror::Error;

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Failures a reactive client call can end with.
///
/// Status handlers produce these from HTTP responses, retry policies inspect
/// them and fallback factories receive them as the failure cause.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// Request timed out.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Error status returned by the target service.
    #[error("{method_key} failed with status {status}: {message}")]
    Status {
        /// Contract key of the method that failed.
        method_key: String,
        /// HTTP status code.
        status: u16,
        /// Response body or reason.
        message: String,
    },

    /// Response body could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Invalid target URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Circuit rejected the call before it was attempted.
    #[error("Command {0} short-circuited")]
    ShortCircuited(String),

    /// URL parsing error.
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl ClientError {
    /// Check if this error is retryable by default.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout(_) | Self::Connection(_) => true,
            // 5xx server errors and 429 rate limit
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Check if this is a timeout error.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    /// Check if this is a connection error.
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Get the HTTP status code if this is a status error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
