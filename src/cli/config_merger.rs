//! Configuration merger for CLI arguments and config files
//!
//! This module handles merging CLI argument overrides with file-based configuration,
//! implementing the configuration precedence logic.

use super::parser::{Cli, Commands};
use crate::config::error::ConfigError;
use crate::config::{ConfigLoader, Environment, settings::Settings};
use std::path::Path;

/// Configuration merger that handles CLI argument integration with file-based configuration
///
/// CLI arguments override configuration file and environment values.
/// Validation runs once, after every override is applied.
pub struct ConfigurationMerger {
    base_config: Settings,
}

impl ConfigurationMerger {
    /// Create a new configuration merger with base configuration
    pub fn new(base_config: Settings) -> Self {
        Self { base_config }
    }

    /// Load the base configuration for the given CLI selections
    ///
    /// # Arguments
    /// * `config_path` - Single configuration file; layered loading when `None`
    /// * `environment` - Environment override; `CARDCAST_APP_ENV` when `None`
    ///
    /// # Errors
    /// Returns ConfigError if configuration loading or parsing fails
    pub fn from_cli_selection(
        config_path: Option<&Path>,
        environment: Option<Environment>,
    ) -> Result<Self, ConfigError> {
        let mut loader = ConfigLoader::new()?;
        if let Some(path) = config_path {
            loader = loader.with_config_file(path);
        }
        if let Some(environment) = environment {
            loader = loader.with_environment(environment);
        }

        Ok(Self::new(loader.load_unvalidated()?))
    }

    /// Merge CLI arguments with the base configuration
    ///
    /// # Returns
    /// A new, validated Settings instance with CLI overrides applied
    pub fn merge_cli_args(&self, cli: &Cli) -> Result<Settings, ConfigError> {
        let mut config = self.base_config.clone();

        Self::apply_global_overrides(&mut config, cli);
        Self::apply_command_overrides(&mut config, &cli.command);

        config.validate()?;

        Ok(config)
    }

    fn apply_global_overrides(config: &mut Settings, cli: &Cli) {
        if cli.verbose {
            config.logger.level = "debug".to_string();
        } else if cli.quiet {
            config.logger.level = "error".to_string();
        }
    }

    fn apply_command_overrides(config: &mut Settings, command: &Commands) {
        match command {
            Commands::Send {
                log_level: Some(level),
                ..
            } => {
                // Command-specific level wins over global flags
                config.logger.level = (*level).into();
            }
            Commands::Render { .. } => {
                // Card output goes to stdout; keep the log quiet unless asked otherwise
                if config.logger.level == "info" {
                    config.logger.level = "warn".to_string();
                }
            }
            _ => {}
        }
    }

    /// Get the base configuration
    pub fn config(&self) -> &Settings {
        &self.base_config
    }
}
