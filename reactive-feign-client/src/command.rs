//! Command keys for the circuit-breaking layer.

use std::fmt;

/// Group and command keys a call is executed under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSetter {
    /// Group key, usually the client name.
    pub group_key: String,
    /// Command key, usually the method key.
    pub command_key: String,
}

/// Builds the [`CommandSetter`] of each client method.
pub trait CommandSetterFactory: fmt::Debug + Send + Sync {
    /// Create the setter for one method of the client named `target`.
    fn create(&self, target: &str, method_key: &str) -> CommandSetter;
}

/// Groups commands by client name.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultCommandSetterFactory;

impl CommandSetterFactory for DefaultCommandSetterFactory {
    fn create(&self, target: &str, method_key: &str) -> CommandSetter {
        CommandSetter {
            group_key: target.to_string(),
            command_key: method_key.to_string(),
        }
    }
}
