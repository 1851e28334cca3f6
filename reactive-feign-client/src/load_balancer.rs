//! Load-balancer settings.
//!
//! A client whose target is a logical service name is load balanced; the retry
//! handler decides how failed calls move between the service's instances.

use std::fmt;
use std::sync::Arc;

use crate::ClientError;

/// Retry handler used by the load balancer.
pub trait RetryHandler: fmt::Debug + Send + Sync {
    /// Retries against the same instance.
    fn retry_same_server(&self) -> u32;

    /// Retries against other instances of the service.
    fn retry_next_server(&self) -> u32;

    /// Check if the error may be retried on another instance.
    fn is_retriable(&self, error: &ClientError) -> bool {
        error.is_connection() || error.is_timeout()
    }
}

/// Retry handler used when none is configured.
#[derive(Debug, Clone, Copy)]
pub struct DefaultRetryHandler {
    /// Retries against the same instance.
    pub same_server: u32,
    /// Retries against other instances.
    pub next_server: u32,
}

impl Default for DefaultRetryHandler {
    fn default() -> Self {
        Self {
            same_server: 0,
            next_server: 1,
        }
    }
}

impl RetryHandler for DefaultRetryHandler {
    fn retry_same_server(&self) -> u32 {
        self.same_server
    }

    fn retry_next_server(&self) -> u32 {
        self.next_server
    }
}

/// Whether calls go through the load balancer.
#[derive(Debug, Clone, Default)]
pub enum LoadBalancing {
    /// Calls go straight to a fixed URL.
    #[default]
    Disabled,
    /// Calls resolve the service name through the load balancer.
    Enabled(Arc<dyn RetryHandler>),
}

impl LoadBalancing {
    /// Check if load balancing is enabled.
    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Enabled(_))
    }

    /// Retry handler in use, if enabled.
    pub fn retry_handler(&self) -> Option<&Arc<dyn RetryHandler>> {
        match self {
            Self::Enabled(handler) => Some(handler),
            Self::Disabled => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_default_retry_handler() {
        let handler = DefaultRetryHandler::default();
        assert_eq!(handler.retry_same_server(), 0);
        assert_eq!(handler.retry_next_server(), 1);
        assert!(handler.is_retriable(&ClientError::Timeout(Duration::from_secs(1))));
        assert!(!handler.is_retriable(&ClientError::Decode("x".into())));
    }

    #[test]
    fn test_load_balancing_accessors() {
        assert!(!LoadBalancing::Disabled.is_enabled());
        let enabled = LoadBalancing::Enabled(Arc::new(DefaultRetryHandler::default()));
        assert!(enabled.is_enabled());
        assert_eq!(enabled.retry_handler().map(|h| h.retry_next_server()), Some(1));
    }
}
