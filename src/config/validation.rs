//! Settings rules checked once at startup, so a bad value fails the
//! command before any event is rendered.

use url::Url;

use crate::config::error::{ConfigError, Section};
use crate::config::settings::{
    BotConfig, CardConfig, DeliveryConfig, FileSettings, LoggerSettings, Settings, SiteConfig,
    TransportConfig,
};
use crate::services::notifications::Language;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: &[&str] = &["full", "compact", "json"];

/// Backoff doubles per attempt, so the attempt count is capped
const MAX_DELIVERY_ATTEMPTS: u32 = 16;

fn http_url(section: Section, key: &'static str, value: &str) -> Result<(), ConfigError> {
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
        Ok(_) => Err(ConfigError::invalid(
            section,
            key,
            format!("'{}' must use http or https", value),
        )),
        Err(e) => Err(ConfigError::invalid(
            section,
            key,
            format!("'{}' is not a URL: {}", value, e),
        )),
    }
}

fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}

impl BotConfig {
    /// The client id doubles as the card app id, so it must be a UUID
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.client_id.trim().is_empty() {
            return Err(ConfigError::invalid(
                Section::Bot,
                "client_id",
                "required; set bot.client_id or CARDCAST_BOT__CLIENT_ID",
            ));
        }
        if uuid::Uuid::parse_str(&self.client_id).is_err() {
            return Err(ConfigError::invalid(
                Section::Bot,
                "client_id",
                format!("'{}' is not a UUID", self.client_id),
            ));
        }
        Ok(())
    }
}

impl TransportConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        http_url(Section::Transport, "relay_url", &self.relay_url)?;
        if self.timeout_secs == 0 {
            return Err(ConfigError::invalid(
                Section::Transport,
                "timeout_secs",
                "must be at least 1 second",
            ));
        }
        Ok(())
    }
}

impl SiteConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        http_url(Section::Site, "url", &self.url)
    }
}

impl CardConfig {
    /// Budgets must leave room beyond the ellipsis; palette entries are `#RRGGBB`
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ellipsis_len = self.ellipsis.chars().count();
        for (key, budget) in [
            ("max_title_length", self.max_title_length),
            ("max_body_length", self.max_body_length),
        ] {
            if budget <= ellipsis_len {
                return Err(ConfigError::invalid(
                    Section::Card,
                    key,
                    format!("{} must exceed the ellipsis length {}", budget, ellipsis_len),
                ));
            }
        }

        if Language::from_tag(&self.default_language).is_none() {
            let supported: Vec<_> = Language::ALL.iter().map(|l| l.tag()).collect();
            return Err(ConfigError::invalid(
                Section::Card,
                "default_language",
                format!(
                    "'{}' is not one of {}",
                    self.default_language,
                    supported.join(", ")
                ),
            ));
        }

        if self.palette.is_empty() {
            return Err(ConfigError::invalid(
                Section::Card,
                "palette",
                "needs at least one color",
            ));
        }
        if let Some(bad) = self.palette.iter().find(|c| !is_hex_color(c)) {
            return Err(ConfigError::invalid(
                Section::Card,
                "palette",
                format!("'{}' is not a #RRGGBB color", bad),
            ));
        }

        if let Some(icon_url) = &self.icon_url {
            http_url(Section::Card, "icon_url", icon_url)?;
        }
        Ok(())
    }
}

impl DeliveryConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_DELIVERY_ATTEMPTS).contains(&self.max_retries) {
            return Err(ConfigError::invalid(
                Section::Delivery,
                "max_retries",
                format!(
                    "{} is outside 1..={}",
                    self.max_retries, MAX_DELIVERY_ATTEMPTS
                ),
            ));
        }
        if self.dispatch_timeout_secs == Some(0) {
            return Err(ConfigError::invalid(
                Section::Delivery,
                "dispatch_timeout_secs",
                "must be at least 1 second when set",
            ));
        }
        Ok(())
    }
}

impl FileSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && self.path.trim().is_empty() {
            return Err(ConfigError::invalid(
                Section::Logger,
                "file.path",
                "required when file output is enabled",
            ));
        }
        if !LOG_FORMATS.contains(&self.format.to_lowercase().as_str()) {
            return Err(ConfigError::invalid(
                Section::Logger,
                "file.format",
                format!("'{}' is not one of {}", self.format, LOG_FORMATS.join(", ")),
            ));
        }
        Ok(())
    }
}

impl LoggerSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !LOG_LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigError::invalid(
                Section::Logger,
                "level",
                format!("'{}' is not one of {}", self.level, LOG_LEVELS.join(", ")),
            ));
        }
        if !self.console.enabled && !self.file.enabled {
            return Err(ConfigError::invalid(
                Section::Logger,
                "console.enabled",
                "console or file output must be enabled",
            ));
        }
        self.file.validate()
    }
}

impl Settings {
    /// Returns the first rule broken, in section order
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bot.validate()?;
        self.transport.validate()?;
        self.site.validate()?;
        self.card.validate()?;
        self.delivery.validate()?;
        self.logger.validate()
    }
}
