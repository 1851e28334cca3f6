//! Contracts map declared interface methods to call metadata.

use std::fmt;

/// Contract used to interpret a client interface.
pub trait Contract: fmt::Debug + Send + Sync {
    /// Name of the contract, used in logs.
    fn name(&self) -> &str;

    /// Key identifying one method of the client interface.
    fn method_key(&self, interface: &str, method: &str) -> String {
        format!("{interface}#{method}()")
    }
}

/// Contract used when nothing else is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultContract;

impl Contract for DefaultContract {
    fn name(&self) -> &str {
        "default"
    }
}
