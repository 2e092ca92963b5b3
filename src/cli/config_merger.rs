//! Configuration merger for CLI arguments and config files
//!
//! CLI arguments override values loaded from configuration files and
//! environment variables.

use super::parser::{Cli, Environment};
use crate::config::error::ConfigError;
use crate::config::{ConfigLoader, settings::Settings};
use std::path::Path;

pub struct ConfigurationMerger {
    base_config: Settings,
}

impl ConfigurationMerger {
    pub fn new(base_config: Settings) -> Self {
        Self { base_config }
    }

    /// Loads configuration from `config_path` if given, otherwise from the
    /// layered configuration directory.
    ///
    /// # Errors
    /// Returns ConfigError if configuration loading or validation fails
    pub fn from_config_path(
        config_path: Option<&Path>,
        environment: Option<&Environment>,
    ) -> Result<Self, ConfigError> {
        let loader = match config_path {
            Some(path) => {
                Self::validate_config_file_access(path)?;
                ConfigLoader::from_file(path)
            }
            None => ConfigLoader::new()?,
        };

        let loader = match environment {
            Some(env) => loader.with_environment(env.clone().into()),
            None => loader,
        };

        Ok(Self::new(loader.load()?))
    }

    fn validate_config_file_access(path: &Path) -> Result<(), ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::file_not_found(path.display().to_string()));
        }

        std::fs::File::open(path).map(|_| ()).map_err(|e| {
            ConfigError::validation(
                "config_file",
                format!("Cannot read configuration file '{}': {}", path.display(), e),
            )
        })
    }

    /// Applies CLI overrides to a copy of the base configuration and
    /// validates the result.
    ///
    /// A subcommand's `--log-level` wins over `--verbose`/`--quiet`.
    pub fn merge_cli_args(&self, cli: &Cli) -> Result<Settings, ConfigError> {
        let mut config = self.base_config.clone();

        if cli.verbose {
            config.logger.level = "debug".to_string();
        } else if cli.quiet {
            config.logger.level = "error".to_string();
        }

        if let Some(level) = cli.command.as_ref().and_then(|c| c.log_level()) {
            config.logger.level = level.clone().into();
        }

        config.validate()?;

        Ok(config)
    }

    pub fn config(&self) -> &Settings {
        &self.base_config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::parser::Cli;
    use crate::config::NotifierKind;
    use clap::Parser;
    use std::io::Write;

    #[test]
    fn test_configuration_merger_new() {
        let base_config = Settings::default();
        let merger = ConfigurationMerger::new(base_config.clone());
        assert_eq!(merger.config(), &base_config);
    }

    #[test]
    fn test_verbose_and_quiet_flags() {
        let merger = ConfigurationMerger::new(Settings::default());

        let cli = Cli::try_parse_from(["steam-price-watch", "--verbose"]).unwrap();
        assert_eq!(merger.merge_cli_args(&cli).unwrap().logger.level, "debug");

        let cli = Cli::try_parse_from(["steam-price-watch", "--quiet"]).unwrap();
        assert_eq!(merger.merge_cli_args(&cli).unwrap().logger.level, "error");
    }

    #[test]
    fn test_command_log_level_overrides_global() {
        let merger = ConfigurationMerger::new(Settings::default());

        let cli = Cli::try_parse_from(["steam-price-watch", "--verbose", "check", "--log-level", "warn"])
            .unwrap();
        assert_eq!(merger.merge_cli_args(&cli).unwrap().logger.level, "warn");
    }

    #[test]
    fn test_merge_revalidates() {
        let mut invalid = Settings::default();
        invalid.notifier.kind = NotifierKind::Telegram;
        let merger = ConfigurationMerger::new(invalid);

        let cli = Cli::try_parse_from(["steam-price-watch"]).unwrap();
        assert!(merger.merge_cli_args(&cli).is_err());
    }

    #[test]
    fn test_from_config_path_loads_single_file() {
        let _lock = crate::config::loader::tests::TEST_MUTEX.lock().unwrap();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[steam]\ndefault_region = \"US\"\n\n[reconciliation]\nprune_orphans = true"
        )
        .unwrap();

        let merger = ConfigurationMerger::from_config_path(Some(file.path()), None).unwrap();
        assert_eq!(merger.config().steam.default_region, "US");
        assert!(merger.config().reconciliation.prune_orphans);
    }

    #[test]
    fn test_from_config_path_missing_file() {
        let result =
            ConfigurationMerger::from_config_path(Some(Path::new("/no/such/config.toml")), None);
        assert!(matches!(result, Err(ConfigError::MissingFile(_))));
    }
}
