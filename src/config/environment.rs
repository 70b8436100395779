//! Deployment environment, selecting which `{environment}.toml` is layered

use clap::ValueEnum;

use crate::config::error::ConfigError;

/// Environment variable naming the deployment environment
pub const APP_ENV_VAR: &str = "CARDCAST_APP_ENV";

/// Shared by `CARDCAST_APP_ENV` and the `--env` flag
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    #[value(alias = "dev")]
    Development,
    Test,
    #[value(alias = "stage")]
    Staging,
    #[value(alias = "prod")]
    Production,
}

impl Environment {
    /// Parses a name or alias, ignoring case
    pub fn parse(name: &str) -> Result<Self, ConfigError> {
        <Self as ValueEnum>::from_str(name.trim(), true)
            .map_err(|_| ConfigError::UnknownEnvironment(name.to_string()))
    }

    /// `CARDCAST_APP_ENV`, or development when unset
    ///
    /// An unrecognized value is an error rather than a silent fallback.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var(APP_ENV_VAR) {
            Ok(name) if !name.trim().is_empty() => Self::parse(&name),
            _ => Ok(Self::default()),
        }
    }

    /// Stem of the layered file for this environment
    pub fn file_stem(self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Test => "test",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}
