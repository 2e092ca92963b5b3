//! Service layer: reconciliation, command handling, notification delivery and
//! the run orchestration that ties them to the stores.

pub mod commands;
pub mod inbound;
pub mod notifications;
pub mod reconciliation;
mod watch_service;

#[cfg(test)]
pub(crate) mod testing;

pub use commands::{Command, CommandConfig, CommandError, CommandOutcome, CommandProcessor};
pub use inbound::{CommandSource, InboundCommand, TelegramCommandSource};
pub use notifications::Notifier;
pub use reconciliation::{
    ItemOutcome, PriceChange, Reconciler, ReconcilerConfig, Reconciliation, Report,
};
pub use watch_service::{RunSummary, WatchService};
