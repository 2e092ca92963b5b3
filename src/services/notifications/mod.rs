//! Notification system with pluggable providers.
//!
//! `NotificationProvider` is the transport seam; `Notifier` is what the rest
//! of the crate talks to.

mod console_provider;
mod notifier;
mod provider;
mod telegram_provider;
mod webhook_provider;

pub use console_provider::ConsoleProvider;
pub use notifier::Notifier;
pub use provider::{NotificationMessage, NotificationProvider, NotificationResult};
pub use telegram_provider::{TELEGRAM_MESSAGE_LIMIT, TelegramProvider, split_message};
pub use webhook_provider::WebhookProvider;
