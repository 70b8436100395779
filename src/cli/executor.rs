//! Command executor for dispatching CLI commands
//!
//! This module provides the main entry point for executing CLI commands
//! after parsing and configuration loading.

use super::handlers::{CheckCommandHandler, RenderCommandHandler, SendCommandHandler};
use super::parser::{Cli, Commands};
use crate::config::settings::Settings;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Execute a CLI command with the given settings
///
/// # Arguments
/// * `cli` - Parsed CLI arguments
/// * `settings` - Merged and validated settings
///
/// # Errors
/// Returns errors from command handlers or validation failures
pub async fn execute_command(cli: &Cli, settings: Settings) -> AppResult<()> {
    validate_command_args(cli)?;

    let state = AppState::from_settings(settings)?;

    match &cli.command {
        Commands::Render { event, pretty } => {
            RenderCommandHandler::new(state).execute(event, *pretty).await
        }
        Commands::Send { event, dry_run, .. } => {
            SendCommandHandler::new(state).execute(event, *dry_run).await
        }
        Commands::Check { skip_verify } => {
            CheckCommandHandler::new(state).execute(*skip_verify).await
        }
    }
}

/// Validate command arguments before execution
fn validate_command_args(cli: &Cli) -> AppResult<()> {
    cli.validate().map_err(|reason| AppError::Validation {
        field: "cli_arguments".to_string(),
        reason,
    })
}
