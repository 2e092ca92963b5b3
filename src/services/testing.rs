//! Test doubles shared by the service tests.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bigdecimal::BigDecimal;

use crate::error::{AppError, AppResult};
use crate::external::PriceSource;
use crate::models::PriceQuote;
use crate::services::inbound::{CommandSource, InboundCommand};
use crate::services::notifications::{
    NotificationMessage, NotificationProvider, NotificationResult,
};

/// Price source answering from a fixed table; unknown ids are unavailable.
#[derive(Default)]
pub struct FakePriceSource {
    quotes: HashMap<String, PriceQuote>,
    calls: AtomicUsize,
    regions: Mutex<Vec<String>>,
}

impl FakePriceSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_price(self, product_id: &str, price: &str) -> Self {
        self.with_quote(product_id, PriceQuote::new(BigDecimal::from_str(price).unwrap()))
    }

    pub fn with_quote(mut self, product_id: &str, quote: PriceQuote) -> Self {
        self.quotes.insert(product_id.to_string(), quote);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn regions(&self) -> Vec<String> {
        self.regions.lock().unwrap().clone()
    }
}

#[async_trait]
impl PriceSource for FakePriceSource {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn fetch(&self, product_id: &str, region: &str) -> AppResult<PriceQuote> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.regions.lock().unwrap().push(region.to_string());
        self.quotes
            .get(product_id)
            .cloned()
            .ok_or_else(|| AppError::PriceUnavailable {
                product_id: product_id.to_string(),
                region: region.to_string(),
            })
    }
}

/// Provider that keeps every message it is asked to send.
#[derive(Default)]
pub struct RecordingProvider {
    messages: Mutex<Vec<NotificationMessage>>,
}

impl RecordingProvider {
    pub fn messages(&self) -> Vec<NotificationMessage> {
        self.messages.lock().unwrap().clone()
    }

    pub fn bodies(&self) -> Vec<String> {
        self.messages().into_iter().map(|m| m.body).collect()
    }
}

#[async_trait]
impl NotificationProvider for RecordingProvider {
    async fn send(&self, message: &NotificationMessage) -> AppResult<NotificationResult> {
        self.messages.lock().unwrap().push(message.clone());
        Ok(NotificationResult {
            success: true,
            status_code: Some(200),
            response: None,
            duration_ms: 0,
        })
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

pub struct FailingProvider;

#[async_trait]
impl NotificationProvider for FailingProvider {
    async fn send(&self, _message: &NotificationMessage) -> AppResult<NotificationResult> {
        Err(AppError::ExternalApi {
            platform: "test".to_string(),
            message: "unreachable".to_string(),
            source: None,
        })
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

/// Command source holding at most one pending command.
#[derive(Default)]
pub struct FakeCommandSource {
    pending: Mutex<Option<InboundCommand>>,
    acknowledged: Mutex<Vec<i64>>,
    failing: bool,
}

impl FakeCommandSource {
    pub fn with_command(update_id: i64, text: &str) -> Self {
        Self {
            pending: Mutex::new(Some(InboundCommand {
                update_id,
                text: text.to_string(),
            })),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn acknowledged(&self) -> Vec<i64> {
        self.acknowledged.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandSource for FakeCommandSource {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn latest_command(&self) -> AppResult<Option<InboundCommand>> {
        if self.failing {
            return Err(AppError::ExternalApi {
                platform: "test".to_string(),
                message: "poll failed".to_string(),
                source: None,
            });
        }
        Ok(self.pending.lock().unwrap().clone())
    }

    async fn acknowledge(&self, command: &InboundCommand) -> AppResult<()> {
        self.acknowledged.lock().unwrap().push(command.update_id);
        *self.pending.lock().unwrap() = None;
        Ok(())
    }
}
