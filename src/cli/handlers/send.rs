//! Send command handler
//!
//! Delivers events through the dispatcher, or prints the outbound messages
//! on a dry run. Either way every event is attempted and reported.

use std::collections::BTreeMap;

use tracing::warn;

use crate::cli::validation::EventSource;
use crate::error::{AppError, AppResult};
use crate::models::{MessageRequest, NotificationEvent};
use crate::services::DispatchOutcome;
use crate::state::AppState;

use super::events::read_events;

/// Handler for the send command
pub struct SendCommandHandler {
    state: AppState,
}

impl SendCommandHandler {
    /// Create a new send command handler
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Execute the send command with optional dry-run support
    ///
    /// # Arguments
    /// * `source` - Where events are read from
    /// * `dry_run` - If true, prints the outbound messages and sends nothing
    ///
    /// # Errors
    /// - Unreadable or malformed event input
    /// - Any event that was not delivered, or on a dry run not prepared
    pub async fn execute(&self, source: &EventSource, dry_run: bool) -> AppResult<()> {
        let events = read_events(source).await?;

        let outcomes = if dry_run {
            let mut outcomes = Vec::with_capacity(events.len());
            for (index, prepared) in self.prepare_all(&events).await.into_iter().enumerate() {
                match prepared {
                    Ok(request) => {
                        println!("{}", serde_json::to_string(&request)?);
                        outcomes.push(DispatchOutcome::Delivered);
                    }
                    Err(e) => {
                        warn!(index, error = %e, "Dry run could not prepare event");
                        println!("✗ event {}: {}", index, e);
                        outcomes.push(DispatchOutcome::Aborted);
                    }
                }
            }
            outcomes
        } else {
            self.state.dispatcher.dispatch_all(&events).await
        };

        for (outcome, count) in &summarize(&outcomes) {
            let label = match (dry_run, outcome) {
                (true, DispatchOutcome::Delivered) => "prepared",
                _ => outcome.as_str(),
            };
            println!("{} {}: {}", status_mark(*outcome), label, count);
        }

        let failed = outcomes.iter().filter(|o| !o.is_delivered()).count();
        if failed > 0 {
            return Err(AppError::Internal {
                source: anyhow::anyhow!(
                    "{} of {} notification(s) were not {}",
                    failed,
                    outcomes.len(),
                    if dry_run { "prepared" } else { "delivered" }
                ),
            });
        }

        Ok(())
    }

    /// Builds every outbound message, keeping going past events that fail
    async fn prepare_all(&self, events: &[NotificationEvent]) -> Vec<AppResult<MessageRequest>> {
        let mut prepared = Vec::with_capacity(events.len());
        for event in events {
            prepared.push(self.state.dispatcher.prepare(event).await);
        }
        prepared
    }
}

fn summarize(outcomes: &[DispatchOutcome]) -> BTreeMap<DispatchOutcome, usize> {
    let mut summary = BTreeMap::new();
    for outcome in outcomes {
        *summary.entry(*outcome).or_insert(0) += 1;
    }
    summary
}

fn status_mark(outcome: DispatchOutcome) -> &'static str {
    if outcome.is_delivered() { "✓" } else { "✗" }
}
