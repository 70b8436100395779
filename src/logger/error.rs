//! Error types for the logger

use thiserror::Error;

/// Errors that can occur while setting up log output
#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("Failed to open log file: {0}")]
    Io(#[from] std::io::Error),
}
