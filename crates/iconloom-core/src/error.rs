//! Error types for iconloom

use thiserror::Error;

/// The main error type for iconloom operations
#[derive(Debug, Error)]
pub enum IconloomError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Backend failure: {0}")]
    BackendFailure(String),

    #[error("Render failure: {0}")]
    RenderFailure(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Invalid {field}: {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Operation cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("JSON error: {0}")]
    JsonError(String),
}

/// Result type alias for iconloom operations
pub type Result<T> = std::result::Result<T, IconloomError>;

impl IconloomError {
    /// Shorthand for boundary validation failures
    pub fn invalid(field: &str, value: &str, reason: impl Into<String>) -> Self {
        IconloomError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<toml::de::Error> for IconloomError {
    fn from(err: toml::de::Error) -> Self {
        IconloomError::TomlParseError(err.to_string())
    }
}

impl From<serde_json::Error> for IconloomError {
    fn from(err: serde_json::Error) -> Self {
        IconloomError::JsonError(err.to_string())
    }
}

impl From<image::ImageError> for IconloomError {
    fn from(err: image::ImageError) -> Self {
        IconloomError::RenderFailure(err.to_string())
    }
}
