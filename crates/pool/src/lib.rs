//! # slotpool
//!
//! Fixed-capacity, thread-safe object pool.
//!
//! A [`FixedPool<T>`] preallocates storage for exactly `N` objects of `T`
//! and offers O(1) [`produce`](FixedPool::produce) (allocate + construct)
//! and [`recycle`](FixedPool::recycle) (destruct + release) without
//! per-object heap traffic. Use it to bound memory for workloads that churn
//! many short-lived objects of one type.
//!
//! ## Quick Start
//!
//! ```rust
//! use slotpool::FixedPool;
//!
//! #[derive(Default)]
//! struct Order {
//!     id: u64,
//!     qty: u32,
//! }
//!
//! let pool = FixedPool::<Order>::new(3);
//!
//! // Raw handles: cleared on recycle, faults are logged and ignored
//! let mut order = pool.produce();
//! assert!(order.is_some());
//! pool.recycle(&mut order);
//! assert!(order.is_none());
//!
//! // RAII guard: recycled when dropped
//! let mut guarded = pool.acquire().unwrap();
//! guarded.qty = 10;
//! ```
//!
//! ## Architecture
//!
//! - `slab`: one raw allocation of `N` uninitialized slots
//! - `list`: intrusive doubly-linked lists over slot indices (free, in use)
//! - [`pool`]: the manager; a single lock guards both lists and every
//!   slot's metadata for the whole of each produce/recycle call
//! - [`Handle`]: slot address plus generation; a stale or foreign handle is
//!   refused on recycle with a `tracing` warning
//! - [`Pooled`]: borrow-checked guard over a handle
//!
//! ## Features
//!
//! - `serde`: `Serialize`/`Deserialize` for [`PoolConfig`] and
//!   [`PoolStatsSnapshot`]

#![cfg_attr(docsrs, feature(doc_cfg))]
// Slot storage is raw memory; every unsafe block carries a SAFETY note.
#![allow(unsafe_code)]

pub mod config;
pub mod error;
pub mod guard;
pub mod handle;
mod list;
pub mod pool;
mod slab;
pub mod stats;

pub use crate::config::{MAX_CAPACITY, PoolConfig};
pub use crate::error::{PoolError, PoolResult};
pub use crate::guard::Pooled;
pub use crate::handle::Handle;
pub use crate::pool::FixedPool;
pub use crate::stats::PoolStatsSnapshot;

// Public API exports
pub mod prelude {
    //! Convenient re-exports of commonly used types.

    pub use crate::config::PoolConfig;
    pub use crate::error::{PoolError, PoolResult};
    pub use crate::guard::Pooled;
    pub use crate::handle::Handle;
    pub use crate::pool::FixedPool;
    pub use crate::stats::PoolStatsSnapshot;
}
