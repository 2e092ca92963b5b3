//! Configuration settings structures for steam-price-watch
//!
//! This module defines all configuration structures that can be loaded from
//! TOML files and environment variables.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::error::ConfigError;
use crate::logger::{ConsoleConfig, FileConfig, LogFormat, LoggerConfig};

// ============================================================================
// Default value functions
// ============================================================================

fn default_app_name() -> String {
    "steam-price-watch".to_string()
}

fn default_app_version() -> String {
    crate::pkg_version().to_string()
}

fn default_tracked_items_path() -> String {
    "data/tracked_items.json".to_string()
}

fn default_prices_path() -> String {
    "data/prices.json".to_string()
}

fn default_steam_base_url() -> String {
    "https://store.steampowered.com".to_string()
}

fn default_region() -> String {
    "PL".to_string()
}

fn default_fetch_timeout() -> u64 {
    10
}

fn default_fetch_concurrency() -> usize {
    1
}

fn default_telegram_api_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_webhook_method() -> String {
    "POST".to_string()
}

fn default_webhook_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_path() -> String {
    "logs/steam-price-watch.log".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

// ============================================================================
// Application Configuration
// ============================================================================

/// Application basic information configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Application name
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Application version
    #[serde(default = "default_app_version")]
    pub version: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            version: default_app_version(),
        }
    }
}

// ============================================================================
// Storage Configuration
// ============================================================================

/// Locations of the two JSON state files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Tracked item definitions (mutated by chat commands)
    #[serde(default = "default_tracked_items_path")]
    pub tracked_items_path: String,

    /// Last observed price per item (mutated by reconciliation)
    #[serde(default = "default_prices_path")]
    pub prices_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            tracked_items_path: default_tracked_items_path(),
            prices_path: default_prices_path(),
        }
    }
}

// ============================================================================
// Steam Storefront Configuration
// ============================================================================

/// Steam storefront price source configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SteamConfig {
    /// Storefront base URL
    #[serde(default = "default_steam_base_url")]
    pub base_url: String,

    /// Two-letter country code used when an item has no region of its own
    #[serde(default = "default_region")]
    pub default_region: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_fetch_timeout")]
    pub timeout_seconds: u64,

    /// Number of price lookups allowed in flight at once
    #[serde(default = "default_fetch_concurrency")]
    pub fetch_concurrency: usize,
}

impl Default for SteamConfig {
    fn default() -> Self {
        Self {
            base_url: default_steam_base_url(),
            default_region: default_region(),
            timeout_seconds: default_fetch_timeout(),
            fetch_concurrency: default_fetch_concurrency(),
        }
    }
}

// ============================================================================
// Reconciliation Configuration
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ReconciliationSettings {
    /// Drop saved prices for items that are no longer tracked
    #[serde(default)]
    pub prune_orphans: bool,
}

// ============================================================================
// Notifier Configuration
// ============================================================================

/// Which provider receives the run report and command replies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NotifierKind {
    Telegram,
    Webhook,
    #[default]
    Console,
}

impl NotifierKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotifierKind::Telegram => "telegram",
            NotifierKind::Webhook => "webhook",
            NotifierKind::Console => "console",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct NotifierConfig {
    #[serde(default)]
    pub kind: NotifierKind,
}

/// Telegram bot configuration, used both for delivery and for inbound commands
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Bot API base URL
    #[serde(default = "default_telegram_api_url")]
    pub api_base_url: String,

    /// Bot token issued by BotFather (keep it in an environment variable)
    #[serde(default)]
    pub bot_token: String,

    /// The single chat that receives reports and may issue commands
    #[serde(default)]
    pub chat_id: String,

    /// Request timeout in seconds
    #[serde(default = "default_fetch_timeout")]
    pub timeout_seconds: u64,

    /// Poll the chat for `/add`, `/remove` and `/list` before each run
    #[serde(default)]
    pub accept_commands: bool,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_telegram_api_url(),
            bot_token: String::new(),
            chat_id: String::new(),
            timeout_seconds: default_fetch_timeout(),
            accept_commands: false,
        }
    }
}

/// Generic webhook delivery configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookConfig {
    #[serde(default)]
    pub url: String,

    /// "POST", "PUT", etc.
    #[serde(default = "default_webhook_method")]
    pub method: String,

    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    #[serde(default = "default_webhook_timeout")]
    pub timeout_seconds: u64,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            method: default_webhook_method(),
            headers: BTreeMap::new(),
            timeout_seconds: default_webhook_timeout(),
        }
    }
}

// ============================================================================
// Logger Settings
// ============================================================================

/// Console output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleSettings {
    /// Whether console output is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Whether to use colored output
    #[serde(default = "default_true")]
    pub colored: bool,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            colored: default_true(),
        }
    }
}

/// File output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSettings {
    /// Whether file output is enabled
    #[serde(default)]
    pub enabled: bool,

    /// Path to the log file
    #[serde(default = "default_log_path")]
    pub path: String,

    /// Whether to append to existing file
    #[serde(default = "default_true")]
    pub append: bool,

    /// Log format: "full", "compact", or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_log_path(),
            append: default_true(),
            format: default_log_format(),
        }
    }
}

/// Logger configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerSettings {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Console output settings
    #[serde(default)]
    pub console: ConsoleSettings,

    /// File output settings
    #[serde(default)]
    pub file: FileSettings,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            console: ConsoleSettings::default(),
            file: FileSettings::default(),
        }
    }
}

impl LoggerSettings {
    /// Convert LoggerSettings to the runtime LoggerConfig
    pub fn into_logger_config(self) -> Result<LoggerConfig, ConfigError> {
        let console_config = ConsoleConfig::new(self.console.enabled, self.console.colored);
        let file_config = self.file.into_file_config()?;

        LoggerConfig::new(console_config, file_config, self.level).map_err(|e| {
            ConfigError::Invalid {
                field: "logger".to_string(),
                message: e.to_string(),
            }
        })
    }
}

impl FileSettings {
    /// Convert FileSettings to FileConfig
    pub fn into_file_config(self) -> Result<FileConfig, ConfigError> {
        let format = self.parse_format()?;

        FileConfig::new(self.enabled, PathBuf::from(self.path), self.append, format).map_err(
            |e| ConfigError::Invalid {
                field: "logger.file".to_string(),
                message: e.to_string(),
            },
        )
    }

    fn parse_format(&self) -> Result<LogFormat, ConfigError> {
        self.format
            .parse::<LogFormat>()
            .map_err(|e| ConfigError::Invalid {
                field: "logger.file.format".to_string(),
                message: e.to_string(),
            })
    }
}

// ============================================================================
// Main Settings Structure
// ============================================================================

/// Complete application settings
///
/// This structure represents the entire configuration that can be loaded
/// from TOML files and environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub application: ApplicationConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub steam: SteamConfig,

    #[serde(default)]
    pub reconciliation: ReconciliationSettings,

    #[serde(default)]
    pub notifier: NotifierConfig,

    #[serde(default)]
    pub telegram: TelegramConfig,

    #[serde(default)]
    pub webhook: WebhookConfig,

    #[serde(default)]
    pub logger: LoggerSettings,
}
