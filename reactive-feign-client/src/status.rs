//! Status handlers turn error responses into [`ClientError`]s.

use std::fmt;

use http::StatusCode;

use crate::ClientError;

/// Decides which response statuses are failures and how they are reported.
pub trait StatusHandler: fmt::Debug + Send + Sync {
    /// Check if the status must be converted into an error.
    fn should_handle(&self, status: StatusCode) -> bool;

    /// Convert a handled response into an error.
    fn decode(&self, method_key: &str, status: StatusCode, body: &str) -> ClientError;
}

/// Handles every non-success status.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultStatusHandler;

impl StatusHandler for DefaultStatusHandler {
    fn should_handle(&self, status: StatusCode) -> bool {
        !status.is_success()
    }

    fn decode(&self, method_key: &str, status: StatusCode, body: &str) -> ClientError {
        let message = if body.is_empty() {
            status.canonical_reason().unwrap_or_default().to_string()
        } else {
            body.to_string()
        };
        ClientError::Status {
            method_key: method_key.to_string(),
            status: status.as_u16(),
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_handles_non_success() {
        let handler = DefaultStatusHandler;
        assert!(!handler.should_handle(StatusCode::OK));
        assert!(handler.should_handle(StatusCode::NOT_FOUND));
        assert!(handler.should_handle(StatusCode::BAD_GATEWAY));
    }

    #[test]
    fn test_decode_uses_reason_for_empty_body() {
        let err = DefaultStatusHandler.decode("Orders#get()", StatusCode::NOT_FOUND, "");
        assert_eq!(err.status_code(), Some(404));
        assert_eq!(err.to_string(), "Orders#get() failed with status 404: Not Found");
    }
}
