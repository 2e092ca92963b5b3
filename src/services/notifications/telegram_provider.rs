//! Telegram notification provider implementation.
//!
//! Delivers messages to the configured chat through the Bot API `sendMessage`
//! method.

use super::provider::{NotificationMessage, NotificationProvider, NotificationResult};
use crate::error::{AppError, AppResult};
use crate::external::TelegramClient;
use async_trait::async_trait;
use std::time::Instant;

/// Bot API limit for a single message, in UTF-16 code units.
pub const TELEGRAM_MESSAGE_LIMIT: usize = 4096;

pub struct TelegramProvider {
    client: TelegramClient,
}

impl TelegramProvider {
    pub fn new(client: TelegramClient) -> Self {
        Self { client }
    }

    fn render(message: &NotificationMessage) -> String {
        match &message.title {
            Some(title) => format!("{}\n{}", title, message.body),
            None => message.body.clone(),
        }
    }
}

/// Length as Telegram counts it. Emoji outside the BMP take two units.
fn telegram_len(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Splits `text` into chunks of at most `limit` UTF-16 code units, breaking on
/// line boundaries. A single line longer than `limit` is cut at character
/// boundaries.
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    let limit = limit.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.split('\n') {
        let line_len = telegram_len(line);
        let needed = if current.is_empty() { line_len } else { line_len + 1 };

        if current_len + needed <= limit {
            if !current.is_empty() {
                current.push('\n');
            }
            current.push_str(line);
            current_len += needed;
            continue;
        }

        if !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if line_len <= limit {
            current.push_str(line);
            current_len = line_len;
        } else {
            let mut piece = String::new();
            let mut piece_len = 0;
            for c in line.chars() {
                let width = c.len_utf16();
                if piece_len + width > limit && !piece.is_empty() {
                    chunks.push(std::mem::take(&mut piece));
                    piece_len = 0;
                }
                piece.push(c);
                piece_len += width;
            }
            chunks.push(piece);
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

#[async_trait]
impl NotificationProvider for TelegramProvider {
    async fn send(&self, message: &NotificationMessage) -> AppResult<NotificationResult> {
        let start = Instant::now();
        let chunks = split_message(&Self::render(message), TELEGRAM_MESSAGE_LIMIT);

        let mut sent = 0;
        for chunk in &chunks {
            if let Err(e) = self.client.send_message(chunk).await {
                return Ok(NotificationResult {
                    success: false,
                    status_code: None,
                    response: Some(format!("{} of {} sent: {}", sent, chunks.len(), e)),
                    duration_ms: start.elapsed().as_millis() as u64,
                });
            }
            sent += 1;
        }

        Ok(NotificationResult {
            success: true,
            status_code: None,
            response: Some(format!("{} message(s) sent", sent)),
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    fn name(&self) -> &'static str {
        "telegram"
    }

    async fn validate_config(&self) -> AppResult<()> {
        if self.client.chat_id().trim().is_empty() {
            return Err(AppError::Validation {
                field: "chat_id".to_string(),
                reason: "Chat id cannot be empty".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_short_text_is_one_chunk() {
        assert_eq!(split_message("a\nb", 10), vec!["a\nb".to_string()]);
    }

    #[test]
    fn test_split_on_line_boundaries() {
        let chunks = split_message("aaaa\nbbbb\ncccc", 9);
        assert_eq!(chunks, vec!["aaaa\nbbbb".to_string(), "cccc".to_string()]);
    }

    #[test]
    fn test_overlong_line_is_cut() {
        let chunks = split_message("abcdefg\nxy", 3);
        assert_eq!(chunks, vec!["abc", "def", "g", "xy"]);
    }

    #[test]
    fn test_astral_emoji_count_as_two_units() {
        let text = "💸".repeat(5);
        assert_eq!(split_message(&text, 10), vec![text.clone()]);
        assert_eq!(split_message(&text, 5), vec!["💸💸", "💸💸", "💸"]);
    }

    #[test]
    fn test_bmp_characters_count_once() {
        let text = "→".repeat(5);
        assert_eq!(split_message(&text, 5), vec![text.clone()]);
    }

    #[test]
    fn test_every_chunk_respects_limit() {
        let report: String = (0..500)
            .map(|i| format!("💸 Price drop! Game number {}: 10.00 → 8.00", i))
            .collect::<Vec<_>>()
            .join("\n");

        let chunks = split_message(&report, TELEGRAM_MESSAGE_LIMIT);
        assert!(chunks.len() > 1);
        assert!(
            chunks
                .iter()
                .all(|c| c.encode_utf16().count() <= TELEGRAM_MESSAGE_LIMIT)
        );
        assert_eq!(chunks.join("\n"), report);
    }

    #[tokio::test]
    async fn test_validate_config_rejects_empty_chat() {
        let provider = TelegramProvider::new(TelegramClient::new(
            "https://api.telegram.org",
            "token",
            " ",
            Duration::from_secs(1),
        ));
        assert!(provider.validate_config().await.is_err());
    }
}
