//! Configuration settings structures for cardcast
//!
//! This module defines all configuration structures that can be loaded from
//! TOML files and environment variables.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::error::{ConfigError, Section};
use crate::logger::{ConsoleConfig, FileConfig, LogFormat, LoggerConfig};
use crate::models::PermalinkStyle;

// ============================================================================
// Default value functions
// ============================================================================

fn default_app_name() -> String {
    "cardcast".to_string()
}

fn default_app_version() -> String {
    crate::pkg_version().to_string()
}

fn default_relay_url() -> String {
    "http://127.0.0.1:7070".to_string()
}

fn default_transport_timeout() -> u64 {
    30
}

fn default_site_url() -> String {
    "http://localhost".to_string()
}

fn default_max_title_length() -> usize {
    28
}

fn default_max_body_length() -> usize {
    256
}

fn default_title_prefix() -> String {
    "💬".to_string()
}

fn default_ellipsis() -> String {
    "...".to_string()
}

fn default_language() -> String {
    "zh_CN".to_string()
}

/// Default card button colors
pub const DEFAULT_PALETTE: [&str; 24] = [
    "#7983C2", "#8F7AC5", "#C5595A", "#C97B46", "#76A048", "#3D98D0", "#5979F0", "#8A64D0",
    "#B76753", "#AA8A46", "#9CAD23", "#6BC0CE", "#6C89D3", "#AA66C3", "#C8697D", "#C49B4B",
    "#5FB05F", "#52A98B", "#75A2CB", "#A75C96", "#9B6D77", "#A49373", "#6AB48F", "#93B289",
];

fn default_palette() -> Vec<String> {
    DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect()
}

fn default_max_retries() -> u32 {
    8
}

fn default_base_delay_ms() -> u64 {
    1000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_path() -> String {
    "logs/cardcast.log".to_string()
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
// Bot & Transport Configuration
// ============================================================================

/// Identity the bot sends messages as
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BotConfig {
    /// Client (app) id on the chat network; also the card's app id
    #[serde(default)]
    pub client_id: String,
}

/// Relay gateway the messages are handed to
///
/// The gateway owns the chat network credentials; `auth_token` is opaque here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Base URL of the relay gateway
    #[serde(default = "default_relay_url")]
    pub relay_url: String,

    /// Bearer token presented to the relay
    #[serde(default)]
    pub auth_token: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_transport_timeout")]
    pub timeout_secs: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            relay_url: default_relay_url(),
            auth_token: String::new(),
            timeout_secs: default_transport_timeout(),
        }
    }
}

// ============================================================================
// Site Configuration
// ============================================================================

/// Site context used to build absolute links in cards
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Public base URL of the site
    #[serde(default = "default_site_url")]
    pub url: String,

    /// Question permalink style
    #[serde(default)]
    pub permalink: PermalinkStyle,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            url: default_site_url(),
            permalink: PermalinkStyle::default(),
        }
    }
}

// ============================================================================
// Card Configuration
// ============================================================================

/// Card rendering limits and presentation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardConfig {
    /// Maximum title length in code points
    #[serde(default = "default_max_title_length")]
    pub max_title_length: usize,

    /// Maximum body length in code points
    #[serde(default = "default_max_body_length")]
    pub max_body_length: usize,

    /// Prefix placed before the question title
    #[serde(default = "default_title_prefix")]
    pub title_prefix: String,

    /// Marker appended to truncated text
    #[serde(default = "default_ellipsis")]
    pub ellipsis: String,

    /// Optional icon shown on the card
    #[serde(default)]
    pub icon_url: Option<String>,

    /// Language used when the receiver's language is not supported
    #[serde(default = "default_language")]
    pub default_language: String,

    /// Button colors, one is picked at random per card
    #[serde(default = "default_palette")]
    pub palette: Vec<String>,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            max_title_length: default_max_title_length(),
            max_body_length: default_max_body_length(),
            title_prefix: default_title_prefix(),
            ellipsis: default_ellipsis(),
            icon_url: None,
            default_language: default_language(),
            palette: default_palette(),
        }
    }
}

// ============================================================================
// Delivery Configuration
// ============================================================================

/// Retry policy for message delivery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryConfig {
    /// Total number of delivery attempts
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base backoff delay in milliseconds, doubled after every attempt
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Upper bound for a whole dispatch including backoff, unbounded if unset
    #[serde(default)]
    pub dispatch_timeout_secs: Option<u64>,
}

impl DeliveryConfig {
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    pub fn dispatch_timeout(&self) -> Option<Duration> {
        self.dispatch_timeout_secs.map(Duration::from_secs)
    }
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
            dispatch_timeout_secs: None,
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
    /// Runtime subscriber config; disabled outputs become `None`
    pub fn into_logger_config(self) -> Result<LoggerConfig, ConfigError> {
        let file = if self.file.enabled {
            let format = self.file.format.parse::<LogFormat>().map_err(|e| {
                ConfigError::invalid(Section::Logger, "file.format", e.to_string())
            })?;
            Some(FileConfig {
                path: PathBuf::from(self.file.path),
                append: self.file.append,
                format,
            })
        } else {
            None
        };

        let config = LoggerConfig {
            level: self.level,
            console: self.console.enabled.then_some(ConsoleConfig {
                colored: self.console.colored,
            }),
            file,
        };
        config
            .validate()
            .map_err(|e| ConfigError::invalid(Section::Logger, "console.enabled", e.to_string()))?;
        Ok(config)
    }
}

// ============================================================================
// Main Settings Structure
// ============================================================================

/// Complete application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub application: ApplicationConfig,

    #[serde(default)]
    pub bot: BotConfig,

    #[serde(default)]
    pub transport: TransportConfig,

    #[serde(default)]
    pub site: SiteConfig,

    #[serde(default)]
    pub card: CardConfig,

    #[serde(default)]
    pub delivery: DeliveryConfig,

    #[serde(default)]
    pub logger: LoggerSettings,
}
