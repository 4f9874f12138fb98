//! Configuration merger for CLI arguments and config files
//!
//! Loads file-based configuration and applies the global CLI overrides on top.

use super::parser::Cli;
use crate::config::error::ConfigError;
use crate::config::{ConfigLoader, Environment, Settings};
use std::path::Path;

/// Configuration merger that handles CLI argument integration with file-based configuration
///
/// CLI arguments override configuration file values.
pub struct ConfigurationMerger {
    base_config: Settings,
}

impl ConfigurationMerger {
    /// Create a new configuration merger with base configuration
    pub fn new(base_config: Settings) -> Self {
        Self { base_config }
    }

    /// Load configuration from `config_path`, or from the layered `config/`
    /// directory when no path is given
    ///
    /// # Errors
    /// Returns ConfigError if configuration loading or validation fails
    pub fn from_config_path(
        config_path: Option<&Path>,
        environment: Option<Environment>,
    ) -> Result<Self, ConfigError> {
        let loader = match config_path {
            Some(path) => ConfigLoader::with_file(path),
            None => ConfigLoader::new()?,
        };

        let loader = match environment {
            Some(env) => loader.with_environment(env),
            None => loader,
        };

        Ok(Self::new(loader.load()?))
    }

    /// Merge CLI arguments with the base configuration
    ///
    /// # Returns
    /// A new Settings instance with CLI overrides applied and validated
    pub fn merge_cli_args(&self, cli: &Cli) -> Result<Settings, ConfigError> {
        let mut config = self.base_config.clone();

        self.apply_global_overrides(&mut config, cli);

        config.validate()?;

        Ok(config)
    }

    /// Apply global CLI argument overrides
    fn apply_global_overrides(&self, config: &mut Settings, cli: &Cli) {
        if cli.verbose {
            config.logger.level = "debug".to_string();
        } else if cli.quiet {
            config.logger.level = "error".to_string();
        }
    }

    /// Get the base configuration
    pub fn config(&self) -> &Settings {
        &self.base_config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::parser::Cli;
    use clap::Parser;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_configuration_merger_new() {
        let base_config = Settings::default();
        let merger = ConfigurationMerger::new(base_config.clone());
        assert_eq!(merger.config(), &base_config);
    }

    #[test]
    fn test_merge_verbose_flag() {
        let merger = ConfigurationMerger::new(Settings::default());
        let cli = Cli::try_parse_from(["batchflow", "--verbose", "send-event"]).unwrap();

        let merged = merger.merge_cli_args(&cli).unwrap();
        assert_eq!(merged.logger.level, "debug");
    }

    #[test]
    fn test_merge_quiet_flag() {
        let merger = ConfigurationMerger::new(Settings::default());
        let cli = Cli::try_parse_from(["batchflow", "--quiet", "send-event"]).unwrap();

        let merged = merger.merge_cli_args(&cli).unwrap();
        assert_eq!(merged.logger.level, "error");
    }

    #[test]
    fn test_merge_keeps_file_level_without_flags() {
        let mut base = Settings::default();
        base.logger.level = "warn".to_string();
        let merger = ConfigurationMerger::new(base);
        let cli = Cli::try_parse_from(["batchflow", "send-event"]).unwrap();

        let merged = merger.merge_cli_args(&cli).unwrap();
        assert_eq!(merged.logger.level, "warn");
    }

    #[test]
    fn test_merge_rejects_invalid_base() {
        let mut base = Settings::default();
        base.batch.request_timeout = 0;
        let merger = ConfigurationMerger::new(base);
        let cli = Cli::try_parse_from(["batchflow", "send-event"]).unwrap();

        assert!(merger.merge_cli_args(&cli).is_err());
    }

    #[test]
    fn test_from_config_path_reads_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[batch]\nprimary_image = \"worker\"\n\n[logger]\nlevel = \"warn\""
        )
        .unwrap();

        let merger = ConfigurationMerger::from_config_path(Some(file.path()), None).unwrap();
        assert_eq!(merger.config().batch.primary_image, "worker");
        assert_eq!(merger.config().logger.level, "warn");
    }
}
