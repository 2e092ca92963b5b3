use clap::Parser;
use steam_price_watch::cli::{self, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = cli::load_and_merge_config(&cli)?;
    cli::init_logger_from_settings(&settings)?;

    tracing::debug!(
        version = steam_price_watch::pkg_version(),
        notifier = settings.notifier.kind.as_str(),
        "Configuration loaded"
    );

    cli::execute_command(&cli, settings).await?;
    Ok(())
}
