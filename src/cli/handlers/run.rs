//! Run command handler

use crate::config::settings::Settings;
use crate::error::AppResult;
use crate::services::WatchService;

pub struct RunCommandHandler {
    config: Settings,
}

impl RunCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Runs once, or with `dry_run` only prints the plan.
    pub async fn execute(&self, dry_run: bool) -> AppResult<()> {
        if dry_run {
            return self.validate_only();
        }

        let summary = WatchService::from_settings(&self.config).run().await?;
        tracing::info!(
            run_id = %summary.run_id,
            tracked_changed = summary.tracked_changed,
            items = summary.report.outcomes().len(),
            "Run complete"
        );
        Ok(())
    }

    /// Validates configuration and prints what a run would do, without
    /// touching the stores or the network.
    pub fn validate_only(&self) -> AppResult<()> {
        self.config.validate()?;

        for line in self.plan() {
            println!("✓ {}", line);
        }
        println!("Dry run completed successfully - configuration is ready");
        Ok(())
    }

    fn plan(&self) -> Vec<String> {
        let c = &self.config;
        let inbound = if c.telegram.accept_commands {
            format!("Inbound commands: Telegram chat {}", c.telegram.chat_id)
        } else {
            "Inbound commands: disabled".to_string()
        };

        vec![
            "Configuration is valid".to_string(),
            inbound,
            format!("Tracked items: {}", c.storage.tracked_items_path),
            format!("Prices: {}", c.storage.prices_path),
            format!(
                "Price source: {} (default region {}, {} concurrent fetches)",
                c.steam.base_url, c.steam.default_region, c.steam.fetch_concurrency
            ),
            format!(
                "Orphaned prices: {}",
                if c.reconciliation.prune_orphans { "pruned" } else { "kept" }
            ),
            format!("Notifier: {}", c.notifier.kind.as_str()),
        ]
    }

    pub fn config(&self) -> &Settings {
        &self.config
    }
}
