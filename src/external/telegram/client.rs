use std::time::Duration;

use reqwest::Url;
use serde::de::DeserializeOwned;

use super::types::{Message, SendMessageRequest, TelegramResponse, Update};
use crate::config::TelegramConfig;
use crate::error::{AppError, AppResult};
use crate::external::client::HTTP_CLIENT;

/// Minimal Telegram Bot API client bound to a single chat.
///
/// The bot token is part of every request URL, so transport errors are
/// stripped of their URL before they reach logs.
#[derive(Debug, Clone)]
pub struct TelegramClient {
    api_base_url: String,
    bot_token: String,
    chat_id: String,
    timeout: Duration,
}

impl TelegramClient {
    pub fn new(
        api_base_url: impl Into<String>,
        bot_token: impl Into<String>,
        chat_id: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
            timeout,
        }
    }

    pub fn from_config(config: &TelegramConfig) -> Self {
        Self::new(
            config.api_base_url.clone(),
            config.bot_token.clone(),
            config.chat_id.clone(),
            Duration::from_secs(config.timeout_seconds),
        )
    }

    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }

    fn make_error(message: impl Into<String>, source: Option<anyhow::Error>) -> AppError {
        AppError::ExternalApi {
            platform: "telegram".into(),
            message: message.into(),
            source,
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.api_base_url.trim_end_matches('/'),
            self.bot_token,
            method
        )
    }

    async fn decode<T: DeserializeOwned>(method: &str, resp: reqwest::Response) -> AppResult<T> {
        let status = resp.status();
        let envelope: TelegramResponse<T> = resp.json().await.map_err(|e: reqwest::Error| {
            Self::make_error(
                format!("{} invalid JSON (HTTP {}): {}", method, status, e.without_url()),
                None,
            )
        })?;

        if !envelope.ok {
            return Err(Self::make_error(
                format!(
                    "{} rejected (HTTP {}): {}",
                    method,
                    status,
                    envelope.description.as_deref().unwrap_or("no description")
                ),
                None,
            ));
        }

        envelope
            .result
            .ok_or_else(|| Self::make_error(format!("{} returned no result", method), None))
    }

    /// Posts `text` to the configured chat.
    pub async fn send_message(&self, text: &str) -> AppResult<Message> {
        let resp = HTTP_CLIENT
            .post(self.method_url("sendMessage"))
            .timeout(self.timeout)
            .json(&SendMessageRequest {
                chat_id: &self.chat_id,
                text,
            })
            .send()
            .await
            .map_err(|e: reqwest::Error| {
                Self::make_error(
                    format!("sendMessage request failed: {}", e.without_url()),
                    None,
                )
            })?;

        Self::decode("sendMessage", resp).await
    }

    /// Fetches pending updates. Passing `offset` confirms every update with a
    /// lower id, so Telegram stops returning them.
    pub async fn get_updates(&self, offset: Option<i64>) -> AppResult<Vec<Update>> {
        let mut params = vec![
            ("timeout", "0".to_string()),
            ("allowed_updates", r#"["message"]"#.to_string()),
        ];
        if let Some(offset) = offset {
            params.push(("offset", offset.to_string()));
        }

        let url = Url::parse_with_params(&self.method_url("getUpdates"), &params)
            .map_err(|e| Self::make_error(format!("getUpdates invalid URL: {}", e), None))?;

        let resp = HTTP_CLIENT
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e: reqwest::Error| {
                Self::make_error(
                    format!("getUpdates request failed: {}", e.without_url()),
                    None,
                )
            })?;

        Self::decode("getUpdates", resp).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> TelegramClient {
        TelegramClient::new(
            "https://api.telegram.org/",
            "123:ABC",
            "42",
            Duration::from_secs(5),
        )
    }

    #[test]
    fn test_method_url() {
        assert_eq!(
            client().method_url("sendMessage"),
            "https://api.telegram.org/bot123:ABC/sendMessage"
        );
    }

    #[test]
    fn test_update_decoding() {
        let json = r#"{"ok":true,"result":[
            {"update_id":900,"message":{"message_id":1,"date":1700000000,"chat":{"id":42},"text":"/list"}},
            {"update_id":901,"edited_message":{"message_id":1,"chat":{"id":42}}}
        ]}"#;
        let envelope: TelegramResponse<Vec<Update>> = serde_json::from_str(json).unwrap();
        let updates = envelope.result.unwrap();

        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0].message.as_ref().unwrap().text.as_deref(), Some("/list"));
        assert!(updates[1].message.is_none());
    }

    #[test]
    fn test_error_envelope_decoding() {
        let json = r#"{"ok":false,"error_code":401,"description":"Unauthorized"}"#;
        let envelope: TelegramResponse<Vec<Update>> = serde_json::from_str(json).unwrap();
        assert!(!envelope.ok);
        assert_eq!(envelope.description.as_deref(), Some("Unauthorized"));
    }

    #[test]
    fn test_send_message_envelope_decoding() {
        let json = r#"{"ok":true,"result":{"message_id":77,"date":1700000000,"chat":{"id":42},"text":"🆕 Saved"}}"#;
        let envelope: TelegramResponse<Message> = serde_json::from_str(json).unwrap();
        let message = envelope.result.unwrap();
        assert_eq!(message.message_id, 77);
        assert_eq!(message.chat.id, 42);

        let rejected: TelegramResponse<Message> =
            serde_json::from_str(r#"{"ok":false,"description":"Bad Request: chat not found"}"#)
                .unwrap();
        assert!(rejected.result.is_none());
    }

    #[test]
    fn test_chat_id_accessor() {
        assert_eq!(client().chat_id(), "42");
    }
}
