//! Check command handler

use crate::config::settings::Settings;
use crate::error::AppResult;
use crate::services::WatchService;

/// Reconciles prices without reading chat commands.
pub struct CheckCommandHandler {
    config: Settings,
}

impl CheckCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    pub async fn execute(&self) -> AppResult<()> {
        let summary = WatchService::from_settings(&self.config).check().await?;
        tracing::info!(
            run_id = %summary.run_id,
            items = summary.report.outcomes().len(),
            "Check complete"
        );
        Ok(())
    }
}
