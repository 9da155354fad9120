use thiserror::Error;

/// Top-level error type for the jeongi client core.
///
/// Subsystem crates define their own error types and convert into this one at
/// crate boundaries so that the `?` operator works across the workspace.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum JeongiError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for JeongiError {
    fn from(err: toml::de::Error) -> Self {
        JeongiError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for JeongiError {
    fn from(err: serde_json::Error) -> Self {
        JeongiError::Serialization(err.to_string())
    }
}

/// Convenience result alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, JeongiError>;
