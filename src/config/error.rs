//! Configuration error types

use thiserror::Error;

/// Errors raised while locating, reading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    MissingFile(String),

    #[error("Failed to deserialize configuration: {0}")]
    Deserialize(String),

    /// A setting holds a value the watcher cannot run with
    #[error("Invalid setting {field}: {message}")]
    Invalid { field: String, message: String },

    #[error("Invalid environment: {0}")]
    Environment(String),

    /// Two configuration sources were selected at once
    #[error("Conflicting configuration sources: {0}")]
    ConflictingSources(String),

    #[error(transparent)]
    Source(#[from] config::ConfigError),
}

impl ConfigError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn file_not_found(path: impl Into<String>) -> Self {
        ConfigError::MissingFile(path.into())
    }

    pub fn conflicting_sources(message: impl Into<String>) -> Self {
        ConfigError::ConflictingSources(message.into())
    }

    /// Dotted setting name for `Invalid`, `None` otherwise
    pub fn field(&self) -> Option<&str> {
        match self {
            ConfigError::Invalid { field, .. } => Some(field),
            _ => None,
        }
    }
}
