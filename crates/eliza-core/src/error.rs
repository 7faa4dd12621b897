use thiserror::Error;

/// Top-level error type for the ELIZA workspace.
///
/// Startup-time failures (configuration, response data) end up here. The
/// chat crate defines its own error type and converts from this one so that
/// `?` works across the crate boundary.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ElizaError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Response data error: {0}")]
    ResponseData(String),
}

impl From<toml::de::Error> for ElizaError {
    fn from(err: toml::de::Error) -> Self {
        ElizaError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for ElizaError {
    fn from(err: serde_json::Error) -> Self {
        ElizaError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for ELIZA operations.
pub type Result<T> = std::result::Result<T, ElizaError>;
