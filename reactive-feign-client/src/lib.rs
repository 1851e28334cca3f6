//! # Reactive Feign Client
//!
//! Builder and capability types for declarative reactive HTTP clients.
//!
//! A client is described by the interface it implements and configured with
//! a set of cross-cutting behaviors:
//!
//! - **Contract**: how interface methods map to calls
//! - **Options**: timeouts, compression and redirects
//! - **Retry policy**: which failures are retried and with what backoff
//! - **Status handler**: which response statuses are errors
//! - **Load balancing**: retry handler used when the target is a service name
//! - **Fallbacks**: substitute implementations used when a call fails
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use reactive_feign_client::{BackoffRetryPolicy, ReactiveFeignBuilder, ReactiveOptions};
//!
//! trait Orders: Send + Sync {}
//!
//! let client = ReactiveFeignBuilder::<dyn Orders>::new()
//!     .options(Arc::new(ReactiveOptions::builder().read_timeout(Duration::from_secs(5)).build()))
//!     .retry_when(Arc::new(BackoffRetryPolicy::exponential(3, Duration::from_millis(100))))
//!     .enable_load_balancer()
//!     .target("orders", "http://orders/v1");
//!
//! assert!(client.is_load_balanced());
//! assert_eq!(client.url(), "http://orders/v1");
//! ```

mod builder;
mod client;
mod command;
mod contract;
mod error;
pub mod fallback;
mod load_balancer;
mod options;
mod retry;
mod status;

pub use builder::ReactiveFeignBuilder;
pub use client::{ClientSettings, ReactiveFeignClient};
pub use command::{CommandSetter, CommandSetterFactory, DefaultCommandSetterFactory};
pub use contract::{Contract, DefaultContract};
pub use error::{ClientError, Result};
pub use fallback::{FallbackFactory, FallbackFn};
pub use load_balancer::{DefaultRetryHandler, LoadBalancing, RetryHandler};
pub use options::{ReactiveOptions, ReactiveOptionsBuilder};
pub use retry::{BackoffRetryPolicy, BackoffStrategy, RetryPolicy};
pub use status::{DefaultStatusHandler, StatusHandler};

// Re-export common types
pub use http::StatusCode;
pub use url::Url;

/// Prelude for common imports.
///
/// ```
/// use reactive_feign_client::prelude::*;
/// ```
pub mod prelude {
    pub use crate::builder::ReactiveFeignBuilder;
    pub use crate::client::{ClientSettings, ReactiveFeignClient};
    pub use crate::command::{CommandSetter, CommandSetterFactory};
    pub use crate::contract::Contract;
    pub use crate::error::{ClientError, Result};
    pub use crate::fallback::FallbackFactory;
    pub use crate::load_balancer::{LoadBalancing, RetryHandler};
    pub use crate::options::ReactiveOptions;
    pub use crate::retry::{BackoffRetryPolicy, RetryPolicy};
    pub use crate::status::StatusHandler;
}
