//! Configuration validation logic
//!
//! This module provides validation methods for all configuration structures
//! to ensure configuration values are within acceptable ranges and formats.

use reqwest::{Method, Url};

use crate::config::error::ConfigError;
use crate::config::settings::{
    FileSettings, LoggerSettings, NotifierKind, Settings, StorageConfig, SteamConfig,
    TelegramConfig, WebhookConfig,
};

/// Valid log levels
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Valid log formats
const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

/// Upper bound for concurrent storefront lookups
const MAX_FETCH_CONCURRENCY: usize = 16;

/// Whether `region` is a two-letter ASCII country code
pub fn is_valid_region(region: &str) -> bool {
    region.len() == 2 && region.chars().all(|c| c.is_ascii_alphabetic())
}

fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value).map_err(|_| {
        ConfigError::validation(field.to_string(), format!("Invalid URL format: '{}'", value))
    })?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::validation(
            field,
            "URL must use http or https protocol",
        ));
    }

    Ok(())
}

impl StorageConfig {
    /// Validate storage configuration
    ///
    /// # Validation Rules
    /// - Both paths must be set
    /// - The two stores must not share a file
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tracked_items_path.trim().is_empty() {
            return Err(ConfigError::validation(
                "storage.tracked_items_path",
                "Tracked items path cannot be empty.",
            ));
        }

        if self.prices_path.trim().is_empty() {
            return Err(ConfigError::validation(
                "storage.prices_path",
                "Prices path cannot be empty.",
            ));
        }

        if self.tracked_items_path == self.prices_path {
            return Err(ConfigError::validation(
                "storage.prices_path",
                "Tracked items and prices must be stored in different files.",
            ));
        }

        Ok(())
    }
}

impl SteamConfig {
    /// Validate storefront configuration
    ///
    /// # Validation Rules
    /// - Base URL must be http(s)
    /// - Default region must be a two-letter country code
    /// - Timeout must be greater than 0
    /// - Fetch concurrency must be between 1 and 16
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_http_url("steam.base_url", &self.base_url)?;

        if !is_valid_region(&self.default_region) {
            return Err(ConfigError::Invalid {
                field: "steam.default_region".to_string(),
                message: format!(
                    "Region must be a two-letter country code, got '{}'.",
                    self.default_region
                ),
            });
        }

        if self.timeout_seconds == 0 {
            return Err(ConfigError::validation(
                "steam.timeout_seconds",
                "Timeout must be greater than 0 seconds.",
            ));
        }

        if self.fetch_concurrency == 0 || self.fetch_concurrency > MAX_FETCH_CONCURRENCY {
            return Err(ConfigError::Invalid {
                field: "steam.fetch_concurrency".to_string(),
                message: format!(
                    "Fetch concurrency must be between 1 and {}, got {}.",
                    MAX_FETCH_CONCURRENCY, self.fetch_concurrency
                ),
            });
        }

        Ok(())
    }
}

impl TelegramConfig {
    /// Validate the bot credentials
    ///
    /// Only called when Telegram is actually used, either as the notifier or as
    /// the inbound command source.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_http_url("telegram.api_base_url", &self.api_base_url)?;

        if self.bot_token.trim().is_empty() {
            return Err(ConfigError::validation(
                "telegram.bot_token",
                "Bot token is required. Set PRICEWATCH_TELEGRAM__BOT_TOKEN.",
            ));
        }

        if self.chat_id.trim().is_empty() {
            return Err(ConfigError::validation(
                "telegram.chat_id",
                "Chat id is required. Set PRICEWATCH_TELEGRAM__CHAT_ID.",
            ));
        }

        if self.timeout_seconds == 0 {
            return Err(ConfigError::validation(
                "telegram.timeout_seconds",
                "Timeout must be greater than 0 seconds.",
            ));
        }

        Ok(())
    }
}

impl WebhookConfig {
    /// Validate webhook delivery settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_http_url("webhook.url", &self.url)?;

        if self.method.parse::<Method>().is_err() {
            return Err(ConfigError::Invalid {
                field: "webhook.method".to_string(),
                message: format!("Invalid HTTP method: {}", self.method),
            });
        }

        if self.timeout_seconds == 0 {
            return Err(ConfigError::validation(
                "webhook.timeout_seconds",
                "Timeout must be greater than 0 seconds.",
            ));
        }

        Ok(())
    }
}

impl FileSettings {
    /// Validate file logging settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LOG_FORMATS.contains(&self.format.to_lowercase().as_str()) {
            return Err(ConfigError::Invalid {
                field: "logger.file.format".to_string(),
                message: format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            });
        }

        if self.enabled && self.path.trim().is_empty() {
            return Err(ConfigError::validation(
                "logger.file.path",
                "Log file path cannot be empty when file output is enabled.",
            ));
        }

        Ok(())
    }
}

impl LoggerSettings {
    /// Validate logger settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LOG_LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigError::Invalid {
                field: "logger.level".to_string(),
                message: format!(
                    "Invalid log level '{}'. Valid levels are: {}",
                    self.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        if !self.console.enabled && !self.file.enabled {
            return Err(ConfigError::validation(
                "logger",
                "At least one output (console or file) must be enabled.",
            ));
        }

        self.file.validate()
    }
}

impl Settings {
    /// Validate the complete configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.storage.validate()?;
        self.steam.validate()?;
        self.logger.validate()?;

        if self.notifier.kind == NotifierKind::Telegram || self.telegram.accept_commands {
            self.telegram.validate()?;
        }

        if self.notifier.kind == NotifierKind::Webhook {
            self.webhook.validate()?;
        }

        Ok(())
    }
}
