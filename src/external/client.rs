use std::time::Duration;

use crate::error::{AppError, AppResult};

/// User-Agent sent to the relay gateway
fn user_agent() -> String {
    format!("cardcast/{}", crate::pkg_version())
}

/// Builds the pooled HTTP client shared by all relay requests
///
/// # Features
/// - **Connection pooling**: Reuses TCP connections across dispatches
/// - **HTTP/2**: Adaptive window sizing and keep-alive
/// - **Compression**: gzip responses
/// - **Timeouts**: `timeout` per request, 10s connect timeout
pub fn build_http_client(timeout: Duration) -> AppResult<reqwest::Client> {
    reqwest::Client::builder()
        // Timeouts
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        // Connection pooling
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(90))
        // HTTP/2 settings
        .http2_adaptive_window(true)
        .http2_keep_alive_interval(Duration::from_secs(10))
        .http2_keep_alive_timeout(Duration::from_secs(20))
        .gzip(true)
        .user_agent(user_agent())
        .build()
        .map_err(|e| AppError::Configuration {
            key: "transport".to_string(),
            source: e.into(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_initialization() {
        assert!(build_http_client(Duration::from_secs(5)).is_ok());
    }

    #[test]
    fn test_user_agent_carries_version() {
        assert!(user_agent().starts_with("cardcast/"));
    }
}
