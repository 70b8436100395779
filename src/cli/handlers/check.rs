//! Check command handler
//!
//! Validates configuration and, unless skipped, the relay credentials.

use tracing::info;

use crate::error::AppResult;
use crate::state::AppState;

/// Handler for the check command
pub struct CheckCommandHandler {
    state: AppState,
}

impl CheckCommandHandler {
    /// Create a new check command handler
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Report the effective configuration and verify the transport
    ///
    /// # Errors
    /// Transport errors when the relay rejects the credentials or is unreachable
    pub async fn execute(&self, skip_verify: bool) -> AppResult<()> {
        let settings = &self.state.settings;

        println!("✓ Configuration is valid");
        println!("✓ Bot client id: {}", settings.bot.client_id);
        println!("✓ Site URL: {}", settings.site.url);
        println!("✓ Default language: {}", settings.card.default_language);
        println!(
            "✓ Delivery: {} attempt(s), {}ms base delay",
            settings.delivery.max_retries, settings.delivery.base_delay_ms
        );

        if skip_verify {
            println!("Relay verification skipped");
            return Ok(());
        }

        self.state.transport.verify().await?;
        info!(
            transport = self.state.transport.name(),
            relay_url = %settings.transport.relay_url,
            "Transport credentials verified"
        );
        println!(
            "✓ Relay accepted credentials: {}",
            settings.transport.relay_url
        );

        Ok(())
    }
}
