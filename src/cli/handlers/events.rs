//! Event input for the render and send commands

use tokio::io::AsyncReadExt;

use crate::cli::validation::EventSource;
use crate::error::{AppError, AppResult};
use crate::models::NotificationEvent;

/// Reads every event from `source`
///
/// The input may hold a single JSON object, a JSON array of objects, or a
/// stream of objects separated by whitespace (newline-delimited JSON).
pub async fn read_events(source: &EventSource) -> AppResult<Vec<NotificationEvent>> {
    let input = match source {
        EventSource::File(path) => tokio::fs::read_to_string(path).await.map_err(|e| {
            AppError::Validation {
                field: "event".to_string(),
                reason: format!("cannot read '{}': {}", path.display(), e),
            }
        })?,
        EventSource::Stdin => {
            let mut input = String::new();
            tokio::io::stdin()
                .read_to_string(&mut input)
                .await
                .map_err(|e| AppError::Validation {
                    field: "event".to_string(),
                    reason: format!("cannot read stdin: {}", e),
                })?;
            input
        }
    };

    parse_events(&input)
}

fn parse_events(input: &str) -> AppResult<Vec<NotificationEvent>> {
    if input.trim_start().starts_with('[') {
        return serde_json::from_str(input).map_err(invalid_event);
    }

    let events = serde_json::Deserializer::from_str(input)
        .into_iter::<NotificationEvent>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(invalid_event)?;

    if events.is_empty() {
        return Err(AppError::Validation {
            field: "event".to_string(),
            reason: "no events in input".to_string(),
        });
    }

    Ok(events)
}

fn invalid_event(error: serde_json::Error) -> AppError {
    AppError::Validation {
        field: "event".to_string(),
        reason: format!("invalid event at line {}: {}", error.line(), error),
    }
}
