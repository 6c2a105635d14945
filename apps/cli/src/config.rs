//! Layered run configuration
//!
//! Sources, lowest priority first:
//! 1. Built-in defaults
//! 2. TOML file given by `--config`
//! 3. `SLOTPOOL_*` environment variables
//! 4. Command-line flags

use anyhow::{Context, Result, ensure};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use slotpool::PoolConfig;

use crate::cli::Cli;

/// Prefix for environment overrides (`SLOTPOOL_CAPACITY`, ...)
pub const ENV_PREFIX: &str = "SLOTPOOL_";

/// Everything a stress run needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StressConfig {
    pub capacity: usize,
    pub name: String,
    pub track_stats: bool,
    pub iterations: u64,
    pub threads: usize,
    pub seed: Option<u64>,
    pub report_every: u64,
    pub verify: bool,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            capacity: 30_000,
            name: "stress".to_string(),
            track_stats: true,
            iterations: 1_000_000,
            threads: 1,
            seed: None,
            report_every: 0,
            verify: false,
        }
    }
}

impl StressConfig {
    /// Merge every source for `cli` and validate the result.
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = &cli.config {
            ensure!(path.is_file(), "config file {} not found", path.display());
            figment = figment.merge(Toml::file_exact(path));
        }
        let config: Self = figment
            .merge(Env::prefixed(ENV_PREFIX))
            .merge(Serialized::defaults(cli.overrides()))
            .extract()
            .context("invalid configuration")?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        ensure!(self.threads > 0, "threads must be at least 1");
        self.pool_config()
            .validate()
            .with_context(|| format!("invalid pool settings for '{}'", self.name))?;
        Ok(())
    }

    /// Pool settings for this run
    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig::with_capacity(self.capacity)
            .with_name(self.name.clone())
            .with_track_stats(self.track_stats)
    }
}
