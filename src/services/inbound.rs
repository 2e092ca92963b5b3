//! Inbound chat commands.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;

use crate::error::AppResult;
use crate::external::TelegramClient;
use crate::external::telegram::Update;

/// A raw command as received from the chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundCommand {
    pub update_id: i64,
    pub text: String,
}

/// Supplies at most one command per run.
#[async_trait]
pub trait CommandSource: Send + Sync {
    fn name(&self) -> &'static str;

    /// Most recent pending command, if any.
    async fn latest_command(&self) -> AppResult<Option<InboundCommand>>;

    /// Marks `command` and everything received before it as handled.
    async fn acknowledge(&self, command: &InboundCommand) -> AppResult<()>;
}

/// Reads commands from the configured Telegram chat via `getUpdates`.
///
/// Updates from other chats and non-text updates are confirmed too, so they
/// never fill the pending queue and hide commands from the configured chat.
pub struct TelegramCommandSource {
    client: TelegramClient,
    /// Highest `update_id` returned by the last poll, -1 before any poll
    highest_seen: AtomicI64,
}

impl TelegramCommandSource {
    pub fn new(client: TelegramClient) -> Self {
        Self {
            client,
            highest_seen: AtomicI64::new(-1),
        }
    }
}

fn highest_update_id(updates: &[Update]) -> Option<i64> {
    updates.iter().map(|update| update.update_id).max()
}

/// Offset confirming `command_id` and every other update seen in the same poll.
fn acknowledge_offset(command_id: i64, highest_seen: i64) -> i64 {
    command_id.max(highest_seen) + 1
}

/// Latest text message sent to `chat_id`; messages from other chats are
/// skipped.
fn latest_from_chat(updates: &[Update], chat_id: &str) -> Option<InboundCommand> {
    updates
        .iter()
        .filter_map(|update| {
            let message = update.message.as_ref()?;
            if message.chat.id.to_string() != chat_id.trim() {
                return None;
            }
            let text = message.text.as_ref()?;
            Some(InboundCommand {
                update_id: update.update_id,
                text: text.clone(),
            })
        })
        .max_by_key(|command| command.update_id)
}

#[async_trait]
impl CommandSource for TelegramCommandSource {
    fn name(&self) -> &'static str {
        "telegram"
    }

    async fn latest_command(&self) -> AppResult<Option<InboundCommand>> {
        let updates = self.client.get_updates(None).await?;
        let command = latest_from_chat(&updates, self.client.chat_id());
        let highest = highest_update_id(&updates);
        tracing::debug!(
            updates = updates.len(),
            found = command.is_some(),
            "Polled inbound commands"
        );

        match (&command, highest) {
            (None, Some(highest)) => {
                tracing::debug!(through = highest, "Discarding updates without a command");
                self.client.get_updates(Some(highest + 1)).await?;
            }
            (Some(_), Some(highest)) => self.highest_seen.store(highest, Ordering::SeqCst),
            (_, None) => {}
        }
        Ok(command)
    }

    async fn acknowledge(&self, command: &InboundCommand) -> AppResult<()> {
        let offset =
            acknowledge_offset(command.update_id, self.highest_seen.load(Ordering::SeqCst));
        self.client.get_updates(Some(offset)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn updates(json: &str) -> Vec<Update> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_latest_message_from_chat_wins() {
        let updates = updates(
            r#"[
            {"update_id":10,"message":{"message_id":1,"chat":{"id":42},"text":"/add A 1"}},
            {"update_id":12,"message":{"message_id":3,"chat":{"id":42},"text":"/list"}},
            {"update_id":11,"message":{"message_id":2,"chat":{"id":42},"text":"/remove A"}}
        ]"#,
        );
        assert_eq!(
            latest_from_chat(&updates, "42"),
            Some(InboundCommand {
                update_id: 12,
                text: "/list".to_string()
            })
        );
    }

    #[test]
    fn test_other_chats_and_non_text_are_skipped() {
        let updates = updates(
            r#"[
            {"update_id":20,"message":{"message_id":1,"chat":{"id":42},"text":"/list"}},
            {"update_id":21,"message":{"message_id":2,"chat":{"id":7},"text":"/remove A"}},
            {"update_id":22,"message":{"message_id":3,"chat":{"id":42}}},
            {"update_id":23}
        ]"#,
        );
        assert_eq!(latest_from_chat(&updates, "42").unwrap().update_id, 20);
    }

    #[test]
    fn test_no_updates() {
        assert!(latest_from_chat(&[], "42").is_none());
    }

    #[test]
    fn test_foreign_updates_are_confirmed_with_the_command() {
        let updates = updates(
            r#"[
            {"update_id":30,"message":{"message_id":1,"chat":{"id":42},"text":"/list"}},
            {"update_id":31,"message":{"message_id":2,"chat":{"id":7},"text":"spam"}},
            {"update_id":32}
        ]"#,
        );
        let command = latest_from_chat(&updates, "42").unwrap();
        let highest = highest_update_id(&updates).unwrap();

        assert_eq!(command.update_id, 30);
        assert_eq!(acknowledge_offset(command.update_id, highest), 33);
    }

    #[test]
    fn test_foreign_only_updates_have_a_discard_offset() {
        let updates = updates(
            r#"[
            {"update_id":40,"message":{"message_id":1,"chat":{"id":7},"text":"/add A 1"}},
            {"update_id":41}
        ]"#,
        );
        assert!(latest_from_chat(&updates, "42").is_none());
        assert_eq!(highest_update_id(&updates), Some(41));
        assert_eq!(highest_update_id(&[]), None);
    }

    #[test]
    fn test_acknowledge_before_any_poll_uses_command_id() {
        assert_eq!(acknowledge_offset(12, -1), 13);
    }

    #[test]
    fn test_negative_group_chat_ids() {
        let updates = updates(
            r#"[{"update_id":5,"message":{"message_id":1,"chat":{"id":-100123},"text":"/list"}}]"#,
        );
        assert!(latest_from_chat(&updates, "-100123").is_some());
    }
}
