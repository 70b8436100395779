use thiserror::Error;

/// Application-wide error type for the notification pipeline.
///
/// Variants are grouped by how the dispatcher treats them: context and
/// encoding failures abort a dispatch, transport failures are retried,
/// and exhaustion is the terminal delivery failure.
#[derive(Error, Debug)]
pub enum AppError {
    /// Validation error with field-specific details
    #[error("Validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Configuration error with key information
    #[error("Configuration error: {key}")]
    Configuration {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// Site information needed to build absolute links is unavailable
    #[error("Site info unavailable: {message}")]
    SiteInfo { message: String },

    /// Card payload could not be serialized for transport
    #[error("Failed to encode card payload")]
    Encoding {
        #[source]
        source: serde_json::Error,
    },

    /// A single chat transport call failed
    #[error("Transport {operation} failed: {message}")]
    Transport { operation: String, message: String },

    /// Every delivery attempt failed
    #[error("Delivery failed after {attempts} attempts")]
    DeliveryExhausted {
        attempts: u32,
        #[source]
        source: Box<AppError>,
    },

    /// The dispatch deadline elapsed before delivery completed
    #[error("Dispatch deadline of {timeout_secs}s exceeded")]
    DeadlineExceeded { timeout_secs: u64 },

    /// Internal error for unexpected failures
    #[error("Internal error")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    /// Shorthand for a failed transport operation
    pub fn transport(operation: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Transport {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Whether the delivery client should retry after this error
    pub fn is_transient(&self) -> bool {
        matches!(self, AppError::Transport { .. })
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        AppError::Encoding { source: error }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(error: reqwest::Error) -> Self {
        AppError::Transport {
            operation: "http".to_string(),
            message: error.to_string(),
        }
    }
}

impl From<crate::config::error::ConfigError> for AppError {
    fn from(error: crate::config::error::ConfigError) -> Self {
        AppError::Configuration {
            key: error.key_path().unwrap_or_else(|| "settings".to_string()),
            source: error.into(),
        }
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;
