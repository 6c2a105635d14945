//! `slotpool` stress driver
//!
//! Builds one fixed-capacity pool, runs a random produce/recycle workload
//! against it from one or more threads, and prints a summary.

mod cli;
mod config;
mod stress;

use anyhow::{Context, Result};
use clap::Parser;
use slotpool_log::LoggerBuilder;

use crate::cli::Cli;
use crate::config::StressConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut log_config = slotpool_log::Config::from_env();
    if let Some(format) = cli.log_format {
        log_config.format = format;
    }
    if let Some(level) = cli.verbosity() {
        log_config.level = level.to_string();
    }
    let _guard = LoggerBuilder::from_config(log_config)
        .with_service("slotpool")
        .build()
        .context("initializing logging")?;

    let config = StressConfig::load(&cli)?;
    tracing::debug!(?config, "configuration loaded");

    let summary = stress::run(&config)?;
    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("encoding summary")?
        );
    } else {
        print!("{summary}");
    }
    Ok(())
}
