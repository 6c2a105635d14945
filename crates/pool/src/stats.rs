//! Statistics tracking for fixed pools

use core::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Counters for pool operations
///
/// Recording is skipped entirely unless `PoolConfig::track_stats` is set.
#[derive(Debug, Default)]
pub struct PoolStats {
    produced: AtomicU64,
    recycled: AtomicU64,
    exhausted: AtomicU64,
    out_of_range: AtomicU64,
    double_recycles: AtomicU64,
    stale_handles: AtomicU64,
    peak_in_use: AtomicUsize,
}

impl PoolStats {
    pub(crate) fn record_produce(&self, in_use: usize) {
        self.produced.fetch_add(1, Ordering::Relaxed);
        self.peak_in_use.fetch_max(in_use, Ordering::Relaxed);
    }

    pub(crate) fn record_recycle(&self) {
        self.recycled.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_exhausted(&self) {
        self.exhausted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_out_of_range(&self) {
        self.out_of_range.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_double_recycle(&self) {
        self.double_recycles.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_stale_handle(&self) {
        self.stale_handles.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time copy of all counters
    pub fn snapshot(&self) -> PoolStatsSnapshot {
        PoolStatsSnapshot {
            produced: self.produced.load(Ordering::Relaxed),
            recycled: self.recycled.load(Ordering::Relaxed),
            exhausted: self.exhausted.load(Ordering::Relaxed),
            out_of_range: self.out_of_range.load(Ordering::Relaxed),
            double_recycles: self.double_recycles.load(Ordering::Relaxed),
            stale_handles: self.stale_handles.load(Ordering::Relaxed),
            peak_in_use: self.peak_in_use.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of [`PoolStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PoolStatsSnapshot {
    /// Successful produce calls
    pub produced: u64,
    /// Successful recycle calls
    pub recycled: u64,
    /// Produce calls that found the pool exhausted
    pub exhausted: u64,
    /// Recycle calls with an address outside the slab
    pub out_of_range: u64,
    /// Recycle calls on a slot that was already free
    pub double_recycles: u64,
    /// Recycle calls whose generation no longer matched the slot
    pub stale_handles: u64,
    /// Highest number of simultaneously live objects observed
    pub peak_in_use: usize,
}

impl PoolStatsSnapshot {
    /// Total recycle calls that were refused
    pub fn rejected_recycles(&self) -> u64 {
        self.out_of_range + self.double_recycles + self.stale_handles
    }
}
