use clap::Parser;
use course_registry::cli::{Cli, execute_command, load_and_merge_config};
use course_registry::logger::init_logger;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = load_and_merge_config(&cli)
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    init_logger(&settings.logger)?;
    tracing::debug!(command = ?cli.command, "Configuration loaded");

    execute_command(&cli, settings).await
}
