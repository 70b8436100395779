//! CLI argument parsing with clap
//!
//! This module defines the command-line interface structure using clap,
//! including all commands, arguments, and their documentation.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use super::validation::{EventSource, parse_event_source, validate_config_file_path};
use crate::config::Environment;

/// Deliver forum notifications as chat app cards
#[derive(Parser, Debug)]
#[command(name = "cardcast")]
#[command(about = "Deliver forum notifications as chat app cards")]
#[command(long_about = "
Cardcast renders forum notification events into rich app cards and delivers
them to users over a chat network relay, with retries and backoff.

Events are JSON objects. A file may hold one event or a stream of
newline-delimited events; use '-' to read from stdin.

EXAMPLES:
    # Preview the card an event would produce
    cardcast render --event event.json

    # Deliver a single event
    cardcast send --event event.json

    # Deliver a stream of events from another process
    producer | cardcast send --event -

    # Show the outbound message without delivering it
    cardcast send --event event.json --dry-run

    # Validate configuration and relay credentials
    cardcast --env production check

For more information about configuration options, see config/default.toml.
")]
#[command(version = crate::build::CLAP_LONG_VERSION)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    ///
    /// Use a single TOML configuration file instead of the layered
    /// `config/` directory. The file must exist and be readable.
    ///
    /// Example: --config /etc/cardcast/production.toml
    #[arg(short, long, value_name = "FILE", value_parser = validate_config_file_path)]
    pub config: Option<PathBuf>,

    /// Override environment detection
    ///
    /// Selects which `{environment}.toml` is layered over `default.toml`.
    ///
    /// Available values: development (dev), staging (stage), production (prod), test
    #[arg(short, long, value_enum)]
    pub env: Option<Environment>,

    /// Enable verbose logging
    ///
    /// Raises log output to debug level. Cannot be used with --quiet.
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-error output
    ///
    /// Lowers log output to error level. Cannot be used with --verbose.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render events to card JSON without delivering
    ///
    /// Resolves links and language exactly like a delivery would and prints
    /// the resulting card for each event.
    ///
    /// Examples:
    ///   cardcast render --event event.json
    ///   cardcast render --event - --pretty < events.ndjson
    Render {
        /// Event file, or '-' for stdin
        #[arg(short, long, value_name = "FILE", value_parser = parse_event_source)]
        event: EventSource,

        /// Pretty-print the card JSON
        #[arg(long)]
        pretty: bool,
    },
    /// Deliver events to their receivers
    ///
    /// Each event is dispatched concurrently. A summary of outcomes is
    /// printed at the end; the command fails if any event was not delivered.
    ///
    /// Examples:
    ///   cardcast send --event event.json
    ///   cardcast send --event - < events.ndjson
    Send {
        /// Event file, or '-' for stdin
        #[arg(short, long, value_name = "FILE", value_parser = parse_event_source)]
        event: EventSource,

        /// Print the outbound messages instead of delivering them
        #[arg(long)]
        dry_run: bool,

        /// Log level override for this run
        ///
        /// Overrides configuration file settings and global --verbose/--quiet flags.
        ///
        /// Available levels: error, warn, info, debug, trace
        #[arg(long, value_enum)]
        log_level: Option<LogLevel>,
    },
    /// Validate configuration and relay credentials
    ///
    /// Returns exit code 0 if the configuration is valid and the relay
    /// accepts the configured token.
    Check {
        /// Only validate configuration, do not contact the relay
        #[arg(long)]
        skip_verify: bool,
    },
}

/// Log level options
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum LogLevel {
    #[value(name = "error")]
    Error,
    #[value(name = "warn", alias = "warning")]
    Warn,
    #[value(name = "info")]
    Info,
    #[value(name = "debug")]
    Debug,
    #[value(name = "trace")]
    Trace,
}

impl Cli {
    /// Validate argument combinations clap cannot express
    pub fn validate(&self) -> Result<(), String> {
        if self.verbose && self.quiet {
            return Err("Cannot use --verbose and --quiet together".to_string());
        }

        if let Commands::Send {
            dry_run: true,
            log_level: Some(_),
            ..
        } = self.command
        {
            return Err("--log-level has no effect with --dry-run".to_string());
        }

        Ok(())
    }
}

impl From<LogLevel> for String {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => "error".to_string(),
            LogLevel::Warn => "warn".to_string(),
            LogLevel::Info => "info".to_string(),
            LogLevel::Debug => "debug".to_string(),
            LogLevel::Trace => "trace".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_help_flag() {
        let err = Cli::try_parse_from(["cardcast", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_flag() {
        let err = Cli::try_parse_from(["cardcast", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_command_is_required() {
        assert!(Cli::try_parse_from(["cardcast"]).is_err());
    }

    #[test]
    fn test_render_from_stdin() {
        let cli = Cli::try_parse_from(["cardcast", "render", "--event", "-", "--pretty"]).unwrap();
        match cli.command {
            Commands::Render { event, pretty } => {
                assert_eq!(event, EventSource::Stdin);
                assert!(pretty);
            }
            other => panic!("Expected Render command, got {:?}", other),
        }
    }

    #[test]
    fn test_send_command() {
        let cli = Cli::try_parse_from([
            "cardcast",
            "--env",
            "prod",
            "send",
            "-e",
            "-",
            "--log-level",
            "warning",
        ])
        .unwrap();
        assert!(matches!(cli.env, Some(Environment::Production)));
        match cli.command {
            Commands::Send {
                dry_run, log_level, ..
            } => {
                assert!(!dry_run);
                assert!(matches!(log_level, Some(LogLevel::Warn)));
            }
            other => panic!("Expected Send command, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_event_file_is_rejected() {
        let result = Cli::try_parse_from(["cardcast", "send", "--event", "/nonexistent/event.json"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_check_command() {
        let cli = Cli::try_parse_from(["cardcast", "check", "--skip-verify"]).unwrap();
        assert!(matches!(cli.command, Commands::Check { skip_verify: true }));
    }

    #[test]
    fn test_conflicting_verbose_quiet() {
        let err = Cli::try_parse_from(["cardcast", "--verbose", "--quiet", "check"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_validate_rejects_log_level_with_dry_run() {
        let cli = Cli::try_parse_from([
            "cardcast",
            "send",
            "--event",
            "-",
            "--dry-run",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert!(cli.validate().is_err());
    }
}
