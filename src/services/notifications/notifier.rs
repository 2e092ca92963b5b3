//! Best-effort delivery front for the configured provider.

use std::sync::Arc;

use super::provider::{NotificationMessage, NotificationProvider};
use super::{ConsoleProvider, TelegramProvider, WebhookProvider};
use crate::config::{NotifierKind, Settings};
use crate::external::TelegramClient;

/// Delivers report and reply text to the single configured recipient.
///
/// `deliver` never fails: errors and non-success responses are logged at
/// `warn` and swallowed.
#[derive(Clone)]
pub struct Notifier {
    provider: Arc<dyn NotificationProvider>,
    application: String,
}

impl Notifier {
    pub fn new(provider: Arc<dyn NotificationProvider>, application: impl Into<String>) -> Self {
        Self {
            provider,
            application: application.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let provider: Arc<dyn NotificationProvider> = match settings.notifier.kind {
            NotifierKind::Telegram => Arc::new(TelegramProvider::new(
                TelegramClient::from_config(&settings.telegram),
            )),
            NotifierKind::Webhook => Arc::new(WebhookProvider::new(settings.webhook.clone())),
            NotifierKind::Console => Arc::new(ConsoleProvider::new()),
        };
        Self::new(provider, settings.application.name.clone())
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    pub async fn deliver(&self, text: &str) {
        let message =
            NotificationMessage::new(text).with_metadata("application", self.application.as_str());

        match self.provider.send(&message).await {
            Ok(result) if result.success => {
                tracing::debug!(
                    provider = self.provider.name(),
                    duration_ms = result.duration_ms,
                    "Notification delivered"
                );
            }
            Ok(result) => {
                tracing::warn!(
                    provider = self.provider.name(),
                    status_code = ?result.status_code,
                    response = result.response.as_deref().unwrap_or_default(),
                    "Notification was not accepted"
                );
            }
            Err(e) => {
                tracing::warn!(
                    provider = self.provider.name(),
                    error = %e,
                    "Notification delivery failed"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{FailingProvider, RecordingProvider};

    #[tokio::test]
    async fn test_deliver_passes_text_through() {
        let provider = Arc::new(RecordingProvider::default());
        let notifier = Notifier::new(provider.clone(), "steam-price-watch");

        notifier.deliver("✅ Game A unchanged: 10.00").await;

        let sent = provider.messages();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].body, "✅ Game A unchanged: 10.00");
        assert_eq!(sent[0].metadata["application"], "steam-price-watch");
    }

    #[tokio::test]
    async fn test_deliver_swallows_provider_errors() {
        let notifier = Notifier::new(Arc::new(FailingProvider), "app");
        notifier.deliver("anything").await;
        assert_eq!(notifier.provider_name(), "failing");
    }

    #[test]
    fn test_from_settings_picks_configured_provider() {
        let mut settings = Settings::default();
        assert_eq!(Notifier::from_settings(&settings).provider_name(), "console");

        settings.notifier.kind = NotifierKind::Webhook;
        assert_eq!(Notifier::from_settings(&settings).provider_name(), "webhook");

        settings.notifier.kind = NotifierKind::Telegram;
        assert_eq!(Notifier::from_settings(&settings).provider_name(), "telegram");
    }
}
