//! Console notification provider, for local and dry runs.

use super::provider::{NotificationMessage, NotificationProvider, NotificationResult};
use crate::error::AppResult;
use async_trait::async_trait;

/// Prints every message to stdout.
#[derive(Debug, Default, Clone)]
pub struct ConsoleProvider;

impl ConsoleProvider {
    pub fn new() -> Self {
        Self
    }

    fn render(message: &NotificationMessage) -> String {
        match &message.title {
            Some(title) => format!("== {} ==\n{}", title, message.body),
            None => message.body.clone(),
        }
    }
}

#[async_trait]
impl NotificationProvider for ConsoleProvider {
    async fn send(&self, message: &NotificationMessage) -> AppResult<NotificationResult> {
        println!("{}", Self::render(message));
        Ok(NotificationResult {
            success: true,
            status_code: None,
            response: None,
            duration_ms: 0,
        })
    }

    fn name(&self) -> &'static str {
        "console"
    }
}
