//! Core notification provider trait and types.

use crate::error::AppResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Message to be sent via notification provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationMessage {
    /// Message title/subject (optional for some providers)
    pub title: Option<String>,
    /// Message body/content (required)
    pub body: String,
    /// Additional metadata for provider-specific data
    pub metadata: HashMap<String, String>,
}

impl NotificationMessage {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            title: None,
            body: body.into(),
            metadata: HashMap::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Result of a notification send attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationResult {
    /// Whether send was successful
    pub success: bool,
    /// HTTP status code or provider-specific status
    pub status_code: Option<u16>,
    /// Response body or error message
    pub response: Option<String>,
    /// Time taken for the operation in milliseconds
    pub duration_ms: u64,
}

/// Outbound channel for reports and command replies.
///
/// Transport failures are reported as an unsuccessful `NotificationResult`
/// where possible; `Err` is reserved for problems detected before sending.
#[async_trait]
pub trait NotificationProvider: Send + Sync {
    async fn send(&self, message: &NotificationMessage) -> AppResult<NotificationResult>;

    /// Provider name for logging
    fn name(&self) -> &'static str;

    /// Validates provider configuration (optional, default no-op)
    async fn validate_config(&self) -> AppResult<()> {
        Ok(())
    }
}
