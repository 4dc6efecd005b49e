//! Fantasy League Service
//!
//! Entry point for the `fantasy-league` tool. Loads configuration, sets up
//! logging and runs one job against the scraper's JSON output.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use fantasy_league_service::cli::{run, Cli};
use fantasy_league_service::{initialize_logging, load_configuration};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = load_configuration(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(data_dir) = cli.data_dir {
        config.data.data_dir = data_dir;
    }

    // Initialize logging once the format is known
    initialize_logging(&config.logging)?;
    info!("Starting Fantasy League Service v{}", env!("CARGO_PKG_VERSION"));
    info!("Reading data from {:?}", config.data.data_dir);

    if let Err(e) = run(cli.command, &config, cli.output).await {
        error!("Command failed: {:#}", e);
        return Err(e);
    }

    Ok(())
}
