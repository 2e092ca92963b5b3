//! Command executor for dispatching CLI commands

use super::handlers::{ApplyCommandHandler, CheckCommandHandler, RunCommandHandler};
use super::parser::{Cli, Commands};
use crate::config::settings::Settings;
use crate::error::AppResult;

/// Execute a CLI command with merged and validated settings.
///
/// No subcommand means `run`.
pub async fn execute_command(cli: &Cli, settings: Settings) -> AppResult<()> {
    match &cli.command {
        Some(Commands::Run { dry_run, .. }) => {
            RunCommandHandler::new(settings).execute(*dry_run).await
        }
        None => RunCommandHandler::new(settings).execute(false).await,
        Some(Commands::Check { .. }) => CheckCommandHandler::new(settings).execute().await,
        Some(Commands::Command { text }) => {
            ApplyCommandHandler::new(settings).execute(&text.join(" "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::parser::Cli;
    use clap::Parser;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir) -> Settings {
        let mut config = Settings::default();
        config.storage.tracked_items_path =
            dir.path().join("tracked.json").to_string_lossy().into_owned();
        config.storage.prices_path = dir.path().join("prices.json").to_string_lossy().into_owned();
        config
    }

    #[tokio::test]
    async fn test_execute_run_dry_run() {
        let dir = TempDir::new().unwrap();
        let cli = Cli::try_parse_from(["steam-price-watch", "run", "--dry-run"]).unwrap();

        assert!(execute_command(&cli, config_in(&dir)).await.is_ok());
        assert!(!dir.path().join("prices.json").exists());
    }

    #[tokio::test]
    async fn test_execute_command_then_check_with_empty_store() {
        let dir = TempDir::new().unwrap();

        let cli = Cli::try_parse_from(["steam-price-watch", "command", "/list"]).unwrap();
        assert!(execute_command(&cli, config_in(&dir)).await.is_ok());

        // nothing tracked, so no network access and no price file
        let cli = Cli::try_parse_from(["steam-price-watch", "check"]).unwrap();
        assert!(execute_command(&cli, config_in(&dir)).await.is_ok());
        assert!(!dir.path().join("prices.json").exists());
    }
}
