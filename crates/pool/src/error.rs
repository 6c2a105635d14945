//! Errors raised while building a pool or checking its lists

use core::alloc::Layout;
use thiserror::Error;

// ============================================================================
// Main Error Types
// ============================================================================

/// Pool construction and consistency errors
///
/// Runtime faults on the hot path (out-of-range handle, double recycle,
/// stale handle) are *not* errors: they are logged and tolerated. This enum
/// only covers conditions a pool cannot recover from.
#[must_use = "errors should be handled"]
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    #[error("Invalid pool capacity: {capacity} (must be between 1 and {max})")]
    InvalidCapacity { capacity: usize, max: usize },

    #[error("Backing storage allocation failed: {size} bytes with {align} byte alignment")]
    AllocationFailed { size: usize, align: usize },

    #[error("Size overflow while computing {what} for {capacity} slots")]
    SizeOverflow { what: &'static str, capacity: usize },

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("List linkage corrupted at slot {index}: {details}")]
    Corruption { index: usize, details: String },
}

impl PoolError {
    /// Whether this error means the pool cannot offer any contract
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::InvalidConfig { .. })
    }

    /// Get error code for categorization
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidCapacity { .. } => "POOL:CONFIG:CAPACITY",
            Self::AllocationFailed { .. } => "POOL:ALLOC:FAILED",
            Self::SizeOverflow { .. } => "POOL:ALLOC:OVERFLOW",
            Self::InvalidConfig { .. } => "POOL:CONFIG:INVALID",
            Self::Corruption { .. } => "POOL:LIST:CORRUPTION",
        }
    }

    // ============================================================================
    // Convenience Constructors
    // ============================================================================

    /// Create invalid capacity error
    pub fn invalid_capacity(capacity: usize, max: usize) -> Self {
        Self::InvalidCapacity { capacity, max }
    }

    /// Create allocation failed error from layout
    pub fn allocation_failed(layout: Layout) -> Self {
        Self::AllocationFailed {
            size: layout.size(),
            align: layout.align(),
        }
    }

    /// Create size overflow error
    pub fn size_overflow(what: &'static str, capacity: usize) -> Self {
        Self::SizeOverflow { what, capacity }
    }

    /// Create invalid config error
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Create linkage corruption error
    pub fn corruption(index: usize, details: impl Into<String>) -> Self {
        Self::Corruption {
            index,
            details: details.into(),
        }
    }
}

/// Result alias used across the crate
pub type PoolResult<T> = Result<T, PoolError>;

/// Log a fatal error and abort the process.
///
/// Used where continuing would mean handing out slots from a pool whose
/// lists no longer partition its storage.
#[cold]
#[inline(never)]
pub(crate) fn abort_on(pool: &str, error: &PoolError) -> ! {
    tracing::error!(pool, code = error.code(), %error, "unrecoverable pool failure, aborting");
    std::process::abort()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            PoolError::invalid_capacity(0, 10).code(),
            "POOL:CONFIG:CAPACITY"
        );
        assert_eq!(
            PoolError::corruption(3, "prev is nil").code(),
            "POOL:LIST:CORRUPTION"
        );
    }

    #[test]
    fn test_fatal_classification() {
        assert!(PoolError::invalid_capacity(0, 10).is_fatal());
        assert!(PoolError::allocation_failed(Layout::new::<u64>()).is_fatal());
        assert!(!PoolError::invalid_config("empty name").is_fatal());
    }

    #[test]
    fn test_display() {
        let err = PoolError::corruption(7, "expected non-nil prev");
        assert_eq!(
            err.to_string(),
            "List linkage corrupted at slot 7: expected non-nil prev"
        );
    }
}
