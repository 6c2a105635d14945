//! Configuration presets for common scenarios

use super::{Config, DisplayConfig, Format};

/// Filter directive, preferred over `RUST_LOG`
pub const ENV_LEVEL: &str = "SLOTPOOL_LOG";
/// Output format: `pretty`, `compact` or `json`
pub const ENV_FORMAT: &str = "SLOTPOOL_LOG_FORMAT";
/// `0`/`false` disables timestamps
pub const ENV_TIME: &str = "SLOTPOOL_LOG_TIME";
/// `0`/`false` disables ANSI colors
pub const ENV_COLORS: &str = "SLOTPOOL_LOG_COLORS";

impl Config {
    /// Create configuration from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from any key/value source.
    ///
    /// Same rules as [`from_env`](Self::from_env); an unknown format falls
    /// back to compact.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(level) = lookup(ENV_LEVEL).or_else(|| lookup("RUST_LOG")) {
            config.level = level;
        }

        if let Some(format) = lookup(ENV_FORMAT) {
            config.format = format.parse().unwrap_or(Format::Compact);
        }

        if let Some(v) = lookup(ENV_TIME) {
            config.display.time = is_enabled(&v);
        }
        if let Some(v) = lookup(ENV_COLORS) {
            config.display.colors = is_enabled(&v);
        }

        config
    }

    /// Development configuration (pretty, debug level)
    #[must_use]
    pub fn development() -> Self {
        Self {
            level: "debug".to_string(),
            format: Format::Pretty,
            display: DisplayConfig {
                source: true,
                ..DisplayConfig::default()
            },
            ..Self::default()
        }
    }

    /// Production configuration (JSON, info level)
    #[must_use]
    pub fn production() -> Self {
        Self {
            level: "info".to_string(),
            format: Format::Json,
            display: DisplayConfig {
                colors: false,
                ..DisplayConfig::default()
            },
            ..Self::default()
        }
    }

    /// Test configuration (plain, trace level)
    #[must_use]
    pub fn test() -> Self {
        Self {
            level: "trace".to_string(),
            format: Format::Compact,
            display: DisplayConfig {
                colors: false,
                time: false,
                ..DisplayConfig::default()
            },
            ..Self::default()
        }
    }
}

fn is_enabled(value: &str) -> bool {
    value != "0" && !value.eq_ignore_ascii_case("false")
}
