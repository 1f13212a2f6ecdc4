use anyhow::Context;
use clap::Parser;
use tracing::debug;

use tax_cli::app;
use tax_cli::cli::Cli;
use tax_cli::config::AppConfig;
use tax_cli::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_optional(cli.config.as_deref())?;
    config.apply(cli.overrides());

    logging::init_logging(&config.logging.level)?;
    if let Some(path) = &config.logging.file {
        logging::enable_file_logging(path)?;
    }
    debug!(?config, "configuration resolved");

    let registry = app::build_registry();
    let mut state = app::open_state(&registry, &config.database)
        .await
        .context("Could not start")?;

    let output = app::execute(&mut state, &registry, cli.command).await?;
    println!("{output}");

    Ok(())
}
