//! # slotpool-log
//!
//! `tracing` subscriber setup shared by the slotpool tools.
//!
//! ## Quick Start
//!
//! ```no_run
//! fn main() -> Result<(), slotpool_log::LogError> {
//!     let _guard = slotpool_log::auto_init()?;
//!
//!     tracing::info!(capacity = 1024, "pool ready");
//!     Ok(())
//! }
//! ```
//!
//! ## Environment
//!
//! - `SLOTPOOL_LOG` (falling back to `RUST_LOG`): filter directive
//! - `SLOTPOOL_LOG_FORMAT`: `pretty`, `compact` or `json`
//! - `SLOTPOOL_LOG_TIME`, `SLOTPOOL_LOG_COLORS`: `0`/`false` to disable

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod builder;
mod config;
mod error;
mod writer;

// Public API
pub use builder::{LoggerBuilder, LoggerGuard};
pub use config::{Config, DisplayConfig, Format, WriterConfig};
pub use error::{LogError, LogResult};

/// Environment variable names read by [`Config::from_env`]
pub mod env {
    pub use crate::config::presets::{ENV_COLORS, ENV_FORMAT, ENV_LEVEL, ENV_TIME};
}

// ============================================================================
// Initialization Functions
// ============================================================================

/// Pick a configuration from the environment and install it.
///
/// An explicit filter variable selects [`Config::from_env`]; otherwise debug
/// builds get [`Config::development`] and release builds
/// [`Config::production`].
pub fn auto_init() -> LogResult<LoggerGuard> {
    if std::env::var(env::ENV_LEVEL).is_ok() || std::env::var("RUST_LOG").is_ok() {
        init_with(Config::from_env())
    } else if cfg!(debug_assertions) {
        init_with(Config::development())
    } else {
        init_with(Config::production())
    }
}

/// Initialize with default configuration
pub fn init() -> LogResult<LoggerGuard> {
    init_with(Config::default())
}

/// Initialize with custom configuration
pub fn init_with(config: Config) -> LogResult<LoggerGuard> {
    LoggerBuilder::from_config(config).build()
}

/// Initialize for tests; a no-op when a global subscriber already exists.
pub fn init_test() -> LogResult<LoggerGuard> {
    if tracing::dispatcher::has_been_set() {
        return Ok(LoggerGuard::noop());
    }
    match init_with(Config::test()) {
        Err(LogError::AlreadyInitialized(_)) => Ok(LoggerGuard::noop()),
        other => other,
    }
}
