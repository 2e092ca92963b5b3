//! Webhook notification provider implementation.

use super::provider::{NotificationMessage, NotificationProvider, NotificationResult};
use crate::config::WebhookConfig;
use crate::error::{AppError, AppResult};
use crate::external::client::HTTP_CLIENT;
use async_trait::async_trait;
use reqwest::{Method, Url};
use serde_json::json;
use std::time::{Duration, Instant};

/// Posts each message as JSON `{title, body, metadata}` to a configured URL.
pub struct WebhookProvider {
    config: WebhookConfig,
}

impl WebhookProvider {
    pub fn new(config: WebhookConfig) -> Self {
        Self { config }
    }

    fn parse_method(&self) -> Result<Method, AppError> {
        self.config
            .method
            .to_uppercase()
            .parse()
            .map_err(|_| AppError::Validation {
                field: "method".to_string(),
                reason: format!("Invalid HTTP method: {}", self.config.method),
            })
    }
}

#[async_trait]
impl NotificationProvider for WebhookProvider {
    async fn send(&self, message: &NotificationMessage) -> AppResult<NotificationResult> {
        let start = Instant::now();

        let method = self.parse_method()?;
        let mut request = HTTP_CLIENT
            .request(method, &self.config.url)
            .timeout(Duration::from_secs(self.config.timeout_seconds))
            .json(&json!({
                "title": message.title,
                "body": message.body,
                "metadata": message.metadata,
            }));

        for (key, value) in &self.config.headers {
            request = request.header(key, value);
        }

        let response = request.send().await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match response {
            Ok(resp) => {
                let status_code = resp.status().as_u16();
                let success = resp.status().is_success();
                let response_text = resp.text().await.ok();

                Ok(NotificationResult {
                    success,
                    status_code: Some(status_code),
                    response: response_text,
                    duration_ms,
                })
            }
            Err(e) => Ok(NotificationResult {
                success: false,
                status_code: None,
                response: Some(e.to_string()),
                duration_ms,
            }),
        }
    }

    fn name(&self) -> &'static str {
        "webhook"
    }

    async fn validate_config(&self) -> AppResult<()> {
        let url = Url::parse(&self.config.url).map_err(|_| AppError::Validation {
            field: "url".to_string(),
            reason: "Invalid URL format".to_string(),
        })?;

        if url.scheme() != "https" && url.scheme() != "http" {
            return Err(AppError::Validation {
                field: "url".to_string(),
                reason: "URL must use http or https protocol".to_string(),
            });
        }

        self.parse_method()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: &str, method: &str) -> WebhookConfig {
        WebhookConfig {
            url: url.to_string(),
            method: method.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_method_is_case_insensitive() {
        let provider = WebhookProvider::new(config("https://example.com/hook", "put"));
        assert_eq!(provider.parse_method().unwrap(), Method::PUT);
    }

    #[tokio::test]
    async fn test_validate_config_accepts_http_and_https() {
        for url in ["http://localhost:8080/hook", "https://example.com/hook"] {
            let provider = WebhookProvider::new(config(url, "POST"));
            assert!(provider.validate_config().await.is_ok(), "{url}");
        }
    }

    #[tokio::test]
    async fn test_validate_config_rejects_bad_url() {
        let provider = WebhookProvider::new(config("ftp://example.com", "POST"));
        assert!(provider.validate_config().await.is_err());

        let provider = WebhookProvider::new(config("not a url", "POST"));
        assert!(provider.validate_config().await.is_err());
    }

    #[tokio::test]
    async fn test_validate_config_rejects_bad_method() {
        let provider = WebhookProvider::new(config("https://example.com", "SEND IT"));
        match provider.validate_config().await {
            Err(AppError::Validation { field, .. }) => assert_eq!(field, "method"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_reports_failure() {
        let provider = WebhookProvider::new(WebhookConfig {
            timeout_seconds: 1,
            ..config("http://127.0.0.1:9/hook", "POST")
        });
        let result = provider
            .send(&NotificationMessage::new("hello"))
            .await
            .unwrap();
        assert!(!result.success);
        assert!(result.status_code.is_none());
    }
}
