//! Retry policies.
//!
//! A policy only decides *whether* and *when* a failed call is retried; the
//! reactive pipeline that executes the call owns the actual retry loop.

use std::fmt;
use std::time::Duration;

use crate::ClientError;

/// Retry policy attached to a client with `retry_when`.
pub trait RetryPolicy: fmt::Debug + Send + Sync {
    /// Check if the call should be retried after `attempt` failed attempts.
    fn should_retry(&self, attempt: u32, error: &ClientError) -> bool;

    /// Get the delay before the next retry.
    fn retry_delay(&self, attempt: u32) -> Duration;
}

/// Retries timeouts, connection failures and selected statuses, waiting
/// according to `backoff` between attempts.
#[derive(Debug, Clone)]
pub struct BackoffRetryPolicy {
    /// Attempts after which the policy gives up.
    pub max_attempts: u32,
    pub backoff: BackoffStrategy,
    /// Response statuses worth another attempt.
    pub retryable_statuses: Vec<u16>,
    pub retry_connection_errors: bool,
    pub retry_timeouts: bool,
}

impl Default for BackoffRetryPolicy {
    fn default() -> Self {
        Self::exponential(3, Duration::from_millis(100))
    }
}

impl BackoffRetryPolicy {
    fn with_backoff(max_attempts: u32, backoff: BackoffStrategy) -> Self {
        Self {
            max_attempts,
            backoff,
            retryable_statuses: vec![408, 429, 500, 502, 503, 504],
            retry_connection_errors: true,
            retry_timeouts: true,
        }
    }

    /// Doubling delays starting at `initial`, capped at 30 seconds.
    pub fn exponential(max_attempts: u32, initial: Duration) -> Self {
        Self::with_backoff(
            max_attempts,
            BackoffStrategy::Exponential {
                initial,
                max: Duration::from_secs(30),
                multiplier: 2.0,
            },
        )
    }

    /// Delays growing by `step` per attempt, capped at 30 seconds.
    pub fn linear(max_attempts: u32, step: Duration) -> Self {
        Self::with_backoff(
            max_attempts,
            BackoffStrategy::Linear {
                step,
                max: Duration::from_secs(30),
            },
        )
    }

    /// Retry straight away.
    pub fn immediate(max_attempts: u32) -> Self {
        Self::with_backoff(max_attempts, BackoffStrategy::None)
    }

    pub fn with_statuses(mut self, statuses: Vec<u16>) -> Self {
        self.retryable_statuses = statuses;
        self
    }

    pub fn without_timeouts(mut self) -> Self {
        self.retry_timeouts = false;
        self
    }
}

impl RetryPolicy for BackoffRetryPolicy {
    fn should_retry(&self, attempt: u32, error: &ClientError) -> bool {
        if attempt >= self.max_attempts {
            return false;
        }

        match error {
            ClientError::Timeout(_) => self.retry_timeouts,
            ClientError::Connection(_) => self.retry_connection_errors,
            ClientError::Status { status, .. } => self.retryable_statuses.contains(status),
            _ => false,
        }
    }

    fn retry_delay(&self, attempt: u32) -> Duration {
        self.backoff.delay_for_attempt(attempt)
    }
}

/// How long to wait before retry number `attempt` (counting from zero).
#[derive(Debug, Clone)]
pub enum BackoffStrategy {
    None,
    Fixed(Duration),
    Linear { step: Duration, max: Duration },
    Exponential {
        initial: Duration,
        max: Duration,
        multiplier: f64,
    },
}

impl BackoffStrategy {
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        match self {
            Self::None => Duration::ZERO,
            Self::Fixed(delay) => *delay,
            Self::Linear { step, max } => step.saturating_mul(attempt.saturating_add(1)).min(*max),
            Self::Exponential {
                initial,
                max,
                multiplier,
            } => {
                let exponent = attempt.min(i32::MAX as u32) as i32;
                let millis = initial.as_millis() as f64 * multiplier.powi(exponent);
                // float to int casts saturate, infinity included
                Duration::from_millis(millis.min(max.as_millis() as f64) as u64)
            }
        }
    }
}
