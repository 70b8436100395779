//! Application state.
//!
//! Builds every shared service from `Settings` once at startup.

use std::sync::Arc;

use crate::config::Settings;
use crate::error::{AppError, AppResult};
use crate::external::{ChatTransport, RelayTransport, SiteInfoProvider, StaticSiteInfo};
use crate::services::notifications::{
    CardRenderer, DeliveryClient, Language, LanguageCatalog, NotificationDispatcher, RetryPolicy,
};

/// Shared services for the lifetime of the process
///
/// Cloning is cheap; every service is behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub transport: Arc<dyn ChatTransport>,
    pub dispatcher: NotificationDispatcher,
}

impl AppState {
    /// Wires services with the HTTP relay transport from configuration
    pub fn from_settings(settings: Settings) -> AppResult<Self> {
        let transport = Arc::new(RelayTransport::from_config(&settings.transport)?);
        Self::with_transport(settings, transport)
    }

    /// Wires services around an existing transport
    pub fn with_transport(
        settings: Settings,
        transport: Arc<dyn ChatTransport>,
    ) -> AppResult<Self> {
        let fallback = Language::from_tag(&settings.card.default_language).ok_or_else(|| {
            AppError::Configuration {
                key: "card.default_language".to_string(),
                source: anyhow::anyhow!(
                    "unsupported language '{}'",
                    settings.card.default_language
                ),
            }
        })?;

        let catalog = Arc::new(LanguageCatalog::new(fallback));
        let renderer = Arc::new(CardRenderer::new(
            settings.card.clone(),
            &settings.bot.client_id,
        ));
        let site_info: Arc<dyn SiteInfoProvider> =
            Arc::new(StaticSiteInfo::from_config(&settings.site));
        let delivery = DeliveryClient::new(
            transport.clone(),
            RetryPolicy::from_config(&settings.delivery),
        );

        let dispatcher = NotificationDispatcher::new(
            &settings.bot.client_id,
            catalog,
            renderer,
            site_info,
            delivery,
        )
        .with_timeout(settings.delivery.dispatch_timeout());

        Ok(Self {
            settings: Arc::new(settings),
            transport,
            dispatcher,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> Settings {
        let mut settings = Settings::default();
        settings.bot.client_id = "6f0a6a4c-8b1e-4e8c-9f3c-1d2e3f4a5b6c".to_string();
        settings
    }

    #[test]
    fn test_from_settings_builds_relay_transport() {
        let state = AppState::from_settings(settings()).unwrap();
        assert_eq!(state.transport.name(), "relay");
    }

    #[test]
    fn test_unsupported_default_language_is_rejected() {
        let mut settings = settings();
        settings.card.default_language = "fr_FR".to_string();
        assert!(matches!(
            AppState::from_settings(settings),
            Err(AppError::Configuration { .. })
        ));
    }
}
