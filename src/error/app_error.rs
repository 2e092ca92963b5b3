use std::path::{Path, PathBuf};

use thiserror::Error;

/// Application-wide error type that represents all possible errors in the system.
///
/// Per-item fetch failures (`ExternalApi`, `PriceUnavailable`) are isolated by the
/// reconciliation engine and never abort a run. `Persistence` failures are fatal for
/// the run that hit them.
#[derive(Error, Debug)]
pub enum AppError {
    /// Validation error with field-specific details
    #[error("Validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Configuration error with key information
    #[error("Configuration error: {key}")]
    Configuration {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// A state file could not be read or written
    #[error("Persistence failed: {operation} {}", .path.display())]
    Persistence {
        path: PathBuf,
        operation: &'static str,
        #[source]
        source: anyhow::Error,
    },

    /// Remote API call failed (transport, HTTP status, or payload)
    #[error("External API error ({platform}): {message}")]
    ExternalApi {
        platform: String,
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// The storefront answered but carries no price for the product
    #[error("No price data for product {product_id} in region {region}")]
    PriceUnavailable { product_id: String, region: String },

    /// Internal error for unexpected failures
    #[error("Internal error")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    pub fn persistence(
        path: &Path,
        operation: &'static str,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        AppError::Persistence {
            path: path.to_path_buf(),
            operation,
            source: source.into(),
        }
    }

    /// Whether this error only affects a single tracked item.
    pub fn is_fetch_unavailable(&self) -> bool {
        matches!(
            self,
            AppError::ExternalApi { .. } | AppError::PriceUnavailable { .. }
        )
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

impl From<crate::config::error::ConfigError> for AppError {
    fn from(error: crate::config::error::ConfigError) -> Self {
        let key = error.field().unwrap_or("settings").to_string();
        AppError::Configuration {
            key,
            source: error.into(),
        }
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;
