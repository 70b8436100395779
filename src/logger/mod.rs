//! Tracing subscriber setup
//!
//! - Console output on stderr, so stdout carries only command output
//! - Optional file output in full, compact or JSON format
//! - Fallback to stderr when the log file becomes unwritable

pub mod config;
pub mod error;
pub(crate) mod writer;


pub use config::*;
pub use error::LoggerError;

use std::io::IsTerminal;

use anyhow::Context;
use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};
use writer::FileWriter;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Install the global subscriber
///
/// # Errors
/// Invalid filter directive, unopenable log file, or a subscriber that is
/// already installed.
pub fn init_logger(config: LoggerConfig) -> anyhow::Result<()> {
    config.validate()?;

    let filter = EnvFilter::try_new(&config.level)
        .with_context(|| format!("Invalid log filter '{}'", config.level))?;

    // File layer goes first so console ANSI settings do not leak into
    // span fields written to the file (tokio-rs/tracing#1817).
    let file = config.file.as_ref().map(file_layer).transpose()?;
    let layers: Vec<BoxedLayer> = file
        .into_iter()
        .chain(config.console.map(console_layer))
        .collect();

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()?;
    Ok(())
}

fn console_layer(config: ConsoleConfig) -> BoxedLayer {
    fmt::layer()
        .with_ansi(config.colored && std::io::stderr().is_terminal())
        .with_target(true)
        .with_writer(std::io::stderr)
        .boxed()
}

fn file_layer(config: &FileConfig) -> anyhow::Result<BoxedLayer> {
    let writer = FileWriter::new(config)?;
    let layer = fmt::layer().with_ansi(false).with_target(true);

    Ok(match config.format {
        LogFormat::Full => layer.with_writer(writer).boxed(),
        LogFormat::Compact => layer.compact().with_writer(writer).boxed(),
        LogFormat::Json => layer.json().with_writer(writer).boxed(),
    })
}
