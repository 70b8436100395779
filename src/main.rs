use anyhow::Context;
use cardcast::cli::{self, Cli};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = cli::load_and_merge_config(&cli)?;
    cli::init_logger_from_settings(&settings)?;

    tracing::debug!(
        app = %settings.application.name,
        version = %settings.application.version,
        build = cardcast::pkg_version(),
        "Starting"
    );

    cli::execute_command(&cli, settings)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Command failed"))
        .context("Command failed")
}
