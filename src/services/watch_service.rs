//! Run orchestration: inbound command first, then price reconciliation.

use std::sync::Arc;

use tracing::Instrument;
use uuid::Uuid;

use crate::config::Settings;
use crate::error::AppResult;
use crate::external::{PriceSource, SteamStore, TelegramClient};
use crate::repositories::Repositories;
use crate::services::commands::{CommandConfig, CommandOutcome, CommandProcessor};
use crate::services::inbound::{CommandSource, TelegramCommandSource};
use crate::services::notifications::Notifier;
use crate::services::reconciliation::{Reconciler, ReconcilerConfig, Report};

/// What a single run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub run_id: Uuid,
    /// Whether an inbound command changed the tracked items
    pub tracked_changed: bool,
    pub report: Report,
}

pub struct WatchService {
    repos: Repositories,
    source: Arc<dyn PriceSource>,
    notifier: Notifier,
    commands: Option<Arc<dyn CommandSource>>,
    reconciler: Reconciler,
    processor: CommandProcessor,
}

impl WatchService {
    pub fn new(
        repos: Repositories,
        source: Arc<dyn PriceSource>,
        notifier: Notifier,
        commands: Option<Arc<dyn CommandSource>>,
        reconciler: Reconciler,
        processor: CommandProcessor,
    ) -> Self {
        Self {
            repos,
            source,
            notifier,
            commands,
            reconciler,
            processor,
        }
    }

    /// Wires the production collaborators from loaded settings.
    pub fn from_settings(settings: &Settings) -> Self {
        let commands: Option<Arc<dyn CommandSource>> = settings.telegram.accept_commands.then(|| {
            Arc::new(TelegramCommandSource::new(TelegramClient::from_config(
                &settings.telegram,
            ))) as Arc<dyn CommandSource>
        });

        Self::new(
            Repositories::from_config(&settings.storage),
            Arc::new(SteamStore::from_config(&settings.steam)),
            Notifier::from_settings(settings),
            commands,
            Reconciler::new(ReconcilerConfig::from_settings(settings)),
            CommandProcessor::new(CommandConfig::from_settings(settings)),
        )
    }

    /// Full run: the latest inbound command, then reconciliation.
    pub async fn run(&self) -> AppResult<RunSummary> {
        let run_id = Uuid::new_v4();
        async {
            tracing::info!(source = self.source.name(), notifier = self.notifier.provider_name(), "Run started");
            let tracked_changed = self.handle_inbound().await?;
            let report = self.reconcile_and_report().await?;
            tracing::info!(items = report.outcomes().len(), "Run finished");
            Ok(RunSummary {
                run_id,
                tracked_changed,
                report,
            })
        }
        .instrument(tracing::info_span!("run", %run_id))
        .await
    }

    /// Reconciliation only, without polling for commands.
    pub async fn check(&self) -> AppResult<RunSummary> {
        let run_id = Uuid::new_v4();
        async {
            let report = self.reconcile_and_report().await?;
            Ok(RunSummary {
                run_id,
                tracked_changed: false,
                report,
            })
        }
        .instrument(tracing::info_span!("check", %run_id))
        .await
    }

    /// Applies `raw` to the tracked item store, saving it when it changed.
    pub fn apply_command(&self, raw: &str) -> AppResult<CommandOutcome> {
        let tracked = self.repos.tracked_items.load()?;
        let outcome = self.processor.process(raw, &tracked);
        if outcome.changed {
            self.repos.tracked_items.save(&outcome.tracked)?;
            tracing::info!(
                store = %self.repos.tracked_items.describe(),
                items = outcome.tracked.len(),
                "Tracked items saved"
            );
        }
        Ok(outcome)
    }

    async fn handle_inbound(&self) -> AppResult<bool> {
        let Some(source) = &self.commands else {
            return Ok(false);
        };

        let command = match source.latest_command().await {
            Ok(Some(command)) => command,
            Ok(None) => return Ok(false),
            Err(e) => {
                tracing::warn!(source = source.name(), error = %e, "Could not poll for commands");
                return Ok(false);
            }
        };

        tracing::info!(update_id = command.update_id, "Processing inbound command");
        let outcome = self.apply_command(&command.text)?;

        if let Some(reply) = &outcome.reply {
            self.notifier.deliver(reply).await;
        }

        if let Err(e) = source.acknowledge(&command).await {
            tracing::warn!(
                source = source.name(),
                update_id = command.update_id,
                error = %e,
                "Could not acknowledge command"
            );
        }

        Ok(outcome.changed)
    }

    async fn reconcile_and_report(&self) -> AppResult<Report> {
        let tracked = self.repos.tracked_items.load()?;
        let prices = self.repos.prices.load()?;

        let reconciliation = self
            .reconciler
            .reconcile(&tracked, &prices, self.source.as_ref())
            .await;

        if !tracked.is_empty() {
            self.repos.prices.save(&reconciliation.prices)?;
            tracing::info!(
                store = %self.repos.prices.describe(),
                prices = reconciliation.prices.len(),
                "Prices saved"
            );
        }

        self.notifier.deliver(&reconciliation.report.render()).await;
        Ok(reconciliation.report)
    }
}
