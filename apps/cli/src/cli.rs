//! Command-line arguments

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use serde::Serialize;
use slotpool_log::Format;

/// Random produce/recycle stress driver for a fixed-capacity pool
#[derive(Debug, Parser)]
#[command(name = "slotpool")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Hammer a fixed-capacity object pool with random produce/recycle calls", long_about = None)]
pub struct Cli {
    /// TOML file with defaults for any of the options below
    #[arg(short, long, env = "SLOTPOOL_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Number of slots in the pool
    #[arg(short = 'n', long)]
    pub capacity: Option<usize>,

    /// Produce/recycle decisions per thread
    #[arg(short, long)]
    pub iterations: Option<u64>,

    /// Worker threads sharing the pool
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Seed for the random workload (random when omitted)
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Log pool occupancy every N iterations (0 disables)
    #[arg(long, value_name = "N")]
    pub report_every: Option<u64>,

    /// Check list invariants at every report and at the end
    #[arg(long)]
    pub verify: bool,

    /// Pool name used in log output
    #[arg(long)]
    pub name: Option<String>,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Log output format
    #[arg(long, value_name = "FORMAT")]
    pub log_format: Option<Format>,

    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Flags given on the command line, as the top configuration layer
#[derive(Debug, Default, Serialize)]
pub struct Overrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    capacity: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    iterations: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    threads: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    report_every: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    verify: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

impl Cli {
    /// Only the flags that were actually passed
    pub fn overrides(&self) -> Overrides {
        Overrides {
            capacity: self.capacity,
            iterations: self.iterations,
            threads: self.threads,
            seed: self.seed,
            report_every: self.report_every,
            verify: self.verify.then_some(true),
            name: self.name.clone(),
        }
    }

    /// Filter directive implied by `-v`, if any
    pub fn verbosity(&self) -> Option<&'static str> {
        match self.verbose {
            0 => None,
            1 => Some("debug"),
            _ => Some("trace"),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn overrides_skip_unset_flags() {
        let cli = Cli::parse_from(["slotpool", "--capacity", "16", "-vv"]);
        let json = serde_json::to_value(cli.overrides()).unwrap();
        assert_eq!(json, serde_json::json!({ "capacity": 16 }));
        assert_eq!(cli.verbosity(), Some("trace"));
    }

    #[test]
    fn verify_only_overrides_when_set() {
        let cli = Cli::parse_from(["slotpool", "--verify", "--log-format", "json"]);
        let json = serde_json::to_value(cli.overrides()).unwrap();
        assert_eq!(json, serde_json::json!({ "verify": true }));
        assert_eq!(cli.log_format, Some(Format::Json));
    }
}
