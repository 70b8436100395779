//! Errors raised while loading or validating settings

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Top-level settings table an invalid key lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Bot,
    Transport,
    Site,
    Card,
    Delivery,
    Logger,
}

impl Section {
    pub fn as_str(self) -> &'static str {
        match self {
            Section::Bot => "bot",
            Section::Transport => "transport",
            Section::Site => "site",
            Section::Card => "card",
            Section::Delivery => "delivery",
            Section::Logger => "logger",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    /// `default.toml` or an explicitly selected file is missing
    #[error("Configuration file not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("CARDCAST_CONFIG_DIR and CARDCAST_CONFIG_FILE cannot both be set")]
    ConflictingSources,

    #[error("Unknown environment '{0}'; expected development, test, staging or production")]
    UnknownEnvironment(String),

    /// A value parsed but breaks a settings rule
    #[error("Invalid {section}.{key}: {message}")]
    Invalid {
        section: Section,
        key: &'static str,
        message: String,
    },

    /// Reading, merging or deserializing the sources failed
    #[error("Failed to read configuration")]
    Source(#[from] config::ConfigError),
}

impl ConfigError {
    pub(crate) fn invalid(section: Section, key: &'static str, message: impl Into<String>) -> Self {
        ConfigError::Invalid {
            section,
            key,
            message: message.into(),
        }
    }

    /// Dotted path of the offending key, e.g. `delivery.max_retries`
    pub fn key_path(&self) -> Option<String> {
        match self {
            ConfigError::Invalid { section, key, .. } => Some(format!("{}.{}", section, key)),
            _ => None,
        }
    }
}
