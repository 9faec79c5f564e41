//! Hubsmoke app cli definition and entrypoint.
pub mod register;
pub mod run;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hubsmoke_core::config::get_config;

/// Hubsmoke - smoke checks for a chatter-hub messaging service.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Show verbose logs.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the harness configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the full smoke suite against the configured service.
    Run,
    /// Register the fixture users and exit.
    Register,
}

fn setup_logging() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("hubsmoke=debug,hubsmoke_core=debug")
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing subscriber: {e}"))?;
    Ok(())
}

pub async fn run_app() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        setup_logging().context("Failed to set up logging")?;
    }

    // Load configuration
    let config = get_config(cli.config.clone()).context("Failed to load configuration")?;
    tracing::debug!(
        base_url = %config.server.base_url,
        fixtures = config.fixtures.len(),
        "configuration loaded"
    );

    match &cli.command {
        Commands::Run => run::execute(&config).await,
        Commands::Register => register::execute(&config).await,
    }
}
