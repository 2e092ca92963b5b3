//! CLI argument parsing with clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Steam price watcher
#[derive(Parser, Debug)]
#[command(name = "steam-price-watch")]
#[command(about = "Tracks Steam store prices and reports changes")]
#[command(long_about = "
steam-price-watch checks the current Steam store price of every tracked game,
compares it with the last saved price and sends one report per run. Tracked
games are managed through chat commands (/add, /remove, /list).

Meant to be started by an external scheduler (cron, systemd timer, CI).

EXAMPLES:
    # Process the latest chat command, then check prices
    steam-price-watch

    # Only check prices
    steam-price-watch check

    # Manage tracked games locally
    steam-price-watch command /add Cyberpunk 1091500 99.99
    steam-price-watch command /list

    # Validate configuration and show what a run would do
    steam-price-watch run --dry-run

    # Use a single configuration file with verbose logging
    steam-price-watch --config /etc/steam-price-watch.toml --verbose
")]
#[command(version = crate::clap_long_version())]
pub struct Cli {
    /// Subcommand to execute (defaults to `run`)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file path
    ///
    /// Load this single TOML file instead of the layered `config/` directory.
    /// Environment variable overrides still apply.
    #[arg(short, long, value_name = "FILE", value_parser = super::validation::validate_config_file_path)]
    pub config: Option<PathBuf>,

    /// Override environment detection
    ///
    /// Available values: development (dev), production (prod), test
    #[arg(short, long, value_enum)]
    pub env: Option<Environment>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Handle the latest chat command, then check prices (default)
    Run {
        /// Log level override
        #[arg(long, value_enum)]
        log_level: Option<LogLevel>,

        /// Validate configuration, print the run plan and exit
        #[arg(long)]
        dry_run: bool,
    },
    /// Check prices without polling for chat commands
    Check {
        /// Log level override
        #[arg(long, value_enum)]
        log_level: Option<LogLevel>,
    },
    /// Apply a chat command to the local tracked items and print the reply
    ///
    /// Examples:
    ///   steam-price-watch command /add Hades 1145360 20
    ///   steam-price-watch command "/remove Hades"
    Command {
        #[arg(
            required = true,
            num_args = 1..,
            trailing_var_arg = true,
            allow_hyphen_values = true,
            value_name = "TEXT",
            value_parser = super::validation::validate_command_word
        )]
        text: Vec<String>,
    },
}

impl Commands {
    pub fn log_level(&self) -> Option<&LogLevel> {
        match self {
            Commands::Run { log_level, .. } | Commands::Check { log_level } => log_level.as_ref(),
            Commands::Command { .. } => None,
        }
    }
}

/// Environment options
#[derive(ValueEnum, Clone, Debug, PartialEq, Eq)]
pub enum Environment {
    #[value(name = "development", alias = "dev")]
    Development,
    #[value(name = "production", alias = "prod")]
    Production,
    #[value(name = "test")]
    Test,
}

/// Log level options
#[derive(ValueEnum, Clone, Debug, PartialEq, Eq)]
pub enum LogLevel {
    #[value(name = "error")]
    Error,
    #[value(name = "warn", alias = "warning")]
    Warn,
    #[value(name = "info")]
    Info,
    #[value(name = "debug")]
    Debug,
    #[value(name = "trace")]
    Trace,
}

impl From<LogLevel> for String {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => "error".to_string(),
            LogLevel::Warn => "warn".to_string(),
            LogLevel::Info => "info".to_string(),
            LogLevel::Debug => "debug".to_string(),
            LogLevel::Trace => "trace".to_string(),
        }
    }
}

impl From<Environment> for crate::config::Environment {
    fn from(env: Environment) -> Self {
        match env {
            Environment::Development => crate::config::Environment::Development,
            Environment::Production => crate::config::Environment::Production,
            Environment::Test => crate::config::Environment::Test,
        }
    }
}
