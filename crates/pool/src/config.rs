//! Pool configuration

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{PoolError, PoolResult};

/// Upper bound on the number of slots a single pool may manage
pub const MAX_CAPACITY: usize = u32::MAX as usize;

/// Configuration for a fixed-capacity pool
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PoolConfig {
    /// Number of slots, fixed for the lifetime of the pool
    pub capacity: usize,

    /// Name used in diagnostics
    pub name: String,

    /// Enable statistics tracking
    pub track_stats: bool,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            capacity: 1024,
            name: "pool".to_string(),
            track_stats: cfg!(debug_assertions),
        }
    }
}

impl PoolConfig {
    /// Configuration with the given capacity and defaults otherwise
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            ..Default::default()
        }
    }

    /// Production configuration - no counters on the hot path
    #[must_use]
    pub fn production(capacity: usize) -> Self {
        Self {
            capacity,
            track_stats: false,
            ..Default::default()
        }
    }

    /// Debug configuration - every event counted
    #[must_use]
    pub fn debug(capacity: usize) -> Self {
        Self {
            capacity,
            track_stats: true,
            ..Default::default()
        }
    }

    /// Set the diagnostic name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Enable or disable statistics
    pub fn with_track_stats(mut self, track_stats: bool) -> Self {
        self.track_stats = track_stats;
        self
    }

    /// Validate configuration, returning an error if invalid.
    pub fn validate(&self) -> PoolResult<()> {
        if self.capacity == 0 || self.capacity > MAX_CAPACITY {
            return Err(PoolError::invalid_capacity(self.capacity, MAX_CAPACITY));
        }
        if self.name.trim().is_empty() {
            return Err(PoolError::invalid_config("pool name must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(PoolConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_capacity_rejected() {
        let err = PoolConfig::with_capacity(0).validate().unwrap_err();
        assert_eq!(err, PoolError::invalid_capacity(0, MAX_CAPACITY));
    }

    #[test]
    fn oversized_capacity_rejected() {
        let err = PoolConfig::with_capacity(MAX_CAPACITY + 1)
            .validate()
            .unwrap_err();
        assert_eq!(err.code(), "POOL:CONFIG:CAPACITY");
    }

    #[test]
    fn blank_name_rejected() {
        let err = PoolConfig::with_capacity(4)
            .with_name("  ")
            .validate()
            .unwrap_err();
        assert!(!err.is_fatal());
    }

    #[test]
    fn presets() {
        assert!(!PoolConfig::production(8).track_stats);
        assert!(PoolConfig::debug(8).track_stats);
        assert_eq!(PoolConfig::debug(8).capacity, 8);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialize_fills_defaults() {
        let config: PoolConfig = serde_json::from_str(r#"{"capacity": 3}"#).unwrap();
        assert_eq!(config.capacity, 3);
        assert_eq!(config.name, "pool");
    }
}
