// Error types for client autoconfiguration

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CloudError {
    #[error("Invalid client configuration: {0}")]
    Config(String),

    #[error("No {capability} found for client {client}")]
    NotFound { capability: String, client: String },

    #[error("No bean of type {0} registered in the application context")]
    NoSuchBean(String),

    #[error(
        "Incompatible {mechanism} instance. {bean_type} is not assignable to {target_type} for client {client}"
    )]
    IncompatibleType {
        mechanism: String,
        bean_type: String,
        target_type: String,
        client: String,
    },

    #[error("Bean {bean_type} is not registered as {expected}")]
    IncompatibleBean { bean_type: String, expected: String },

    #[error("Failed to instantiate {type_name}: {reason}")]
    Instantiation { type_name: String, reason: String },

    #[error("Failed to load configuration: {0}")]
    Load(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, CloudError>;
