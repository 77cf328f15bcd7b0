//! fhirbind command line
//!
//! `fhirbind generate` writes Rust models from StructureDefinitions;
//! `fhirbind check` reports members of a resource that do not survive a
//! parse/serialize round trip.

mod cli;
mod commands;
mod config;
mod logging;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use cli::{Cli, Commands};
use config::CliConfig;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}

/// Returns `false` when a check found mismatches
async fn run() -> Result<bool> {
    let cli = Cli::parse();

    let mut config = CliConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    if cli.log_json {
        config.logging.json = true;
    }
    logging::init_logging(&config.logging).context("Failed to initialize logging")?;

    match &cli.command {
        Commands::Generate(args) => {
            commands::generate::run(args, config.generator).await?;
            Ok(true)
        }
        Commands::Check(args) => commands::check::run(args).await,
    }
}
