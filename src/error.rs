//! Error types for the batch group crate.
//!
//! Task and callback errors are user types and flow through the groups untouched.
//! The variants here only cover failures of the crate's own plumbing.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BatchGroupError {
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
    #[error("Invalid configuration value '{value}' for field '{field}': {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
    #[error("Missing required configuration field '{field}' in {context}")]
    MissingRequiredField { field: String, context: String },
    #[error("Configuration load error: {0}")]
    ConfigLoadError(#[from] config::ConfigError),
}

impl BatchGroupError {
    pub fn missing_required_field(field: impl Into<String>, context: impl Into<String>) -> Self {
        Self::MissingRequiredField {
            field: field.into(),
            context: context.into(),
        }
    }

    pub fn invalid_value(
        field: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BatchGroupError>;
