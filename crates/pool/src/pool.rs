//! Fixed-capacity pool manager
//!
//! # Safety
//!
//! `FixedPool<T>` hands out slots of a [`Slab`] and tracks their state in a
//! [`Node`] array threaded by two [`IndexList`]s:
//! - A slot holds a live `T` iff its node is on the `in_use` list
//! - Both lists and every node are only touched under `state`'s lock
//! - Construction and destruction of `T` also run under the lock, so list
//!   membership and slot initialization change together
//! - A produced slot is owned by whoever holds its handle; the pool does not
//!   touch the payload again until that handle is recycled
//!
//! ## Locking
//!
//! One `parking_lot::Mutex` guards all pool state for the full duration of
//! `produce` and `recycle`. Every allocation in the pool is serialized on
//! it. That is a hard scalability ceiling under contention and the price of
//! list mutation being atomic with respect to every other caller.

use core::fmt;

use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use crate::config::PoolConfig;
use crate::error::{PoolError, PoolResult, abort_on};
use crate::guard::Pooled;
use crate::handle::Handle;
use crate::list::{IndexList, Node};
use crate::slab::Slab;
use crate::stats::{PoolStats, PoolStatsSnapshot};

/// Thread-safe pool of exactly `capacity` preallocated slots for `T`
///
/// # Example
/// ```
/// use slotpool::FixedPool;
///
/// let pool = FixedPool::<Vec<u8>>::new(2);
///
/// let mut first = pool.produce();
/// let second = pool.produce();
/// assert!(first.is_some() && second.is_some());
/// assert!(pool.produce().is_none());
///
/// pool.recycle(&mut first);
/// assert!(first.is_none());
/// assert_eq!(pool.available(), 1);
/// ```
pub struct FixedPool<T> {
    state: Mutex<PoolState>,
    slab: Slab<T>,
    config: PoolConfig,
    stats: PoolStats,
}

struct PoolState {
    nodes: Box<[Node]>,
    free: IndexList,
    in_use: IndexList,
}

impl<T> FixedPool<T> {
    /// Create a pool with `capacity` slots.
    ///
    /// A pool that cannot allocate its own storage has no contract to offer:
    /// zero capacity or allocation failure aborts the process. Use
    /// [`try_new`](Self::try_new) to get the error instead.
    pub fn new(capacity: usize) -> Self {
        let config = PoolConfig::with_capacity(capacity);
        Self::with_config(config.clone()).unwrap_or_else(|error| abort_on(&config.name, &error))
    }

    /// Create a pool with `capacity` slots, reporting failures.
    pub fn try_new(capacity: usize) -> PoolResult<Self> {
        Self::with_config(PoolConfig::with_capacity(capacity))
    }

    /// Create pool with custom configuration
    pub fn with_config(config: PoolConfig) -> PoolResult<Self> {
        config.validate()?;

        let capacity = config.capacity;
        let slab = Slab::new(capacity)?;
        let nodes = Node::chain(capacity);

        debug!(
            pool = %config.name,
            capacity,
            slot_size = core::mem::size_of::<T>(),
            "pool created"
        );

        Ok(Self {
            state: Mutex::new(PoolState {
                nodes,
                free: IndexList::adopt(Some(0), capacity),
                in_use: IndexList::new(),
            }),
            slab,
            config,
            stats: PoolStats::default(),
        })
    }

    /// Produce an object built by `init`.
    ///
    /// Returns `None` when every slot is in use; `init` is not called then.
    /// `init` runs under the pool lock, so it must not call back into this
    /// pool.
    pub fn produce_with<F>(&self, init: F) -> Option<Handle<T>>
    where
        F: FnOnce() -> T,
    {
        let mut guard = self.state.lock();
        if guard.free.is_empty() {
            if self.config.track_stats {
                self.stats.record_exhausted();
            }
            trace!(pool = %self.config.name, "pool exhausted");
            return None;
        }

        // Built before any list changes so a panicking `init` leaves the
        // slot on the free list.
        let value = init();

        let PoolState {
            nodes,
            free,
            in_use,
        } = &mut *guard;
        let Some(index) = free.pop_head(nodes) else {
            abort_on(
                &self.config.name,
                &PoolError::corruption(0, "free list reported members but had no head"),
            );
        };
        in_use.push_head(nodes, index);
        let node = &mut nodes[index];
        node.used = true;
        let generation = node.generation;

        // SAFETY: the node was on the free list, so the slot is vacant, and
        // it is now on in_use under our lock, so nobody else can claim it.
        let ptr = unsafe { self.slab.write(index, value) };

        if self.config.track_stats {
            self.stats.record_produce(in_use.len());
        }
        trace!(pool = %self.config.name, index, generation, "produced");

        Some(Handle::from_raw_parts(ptr, generation))
    }

    /// Recycle `handle` and clear the caller's variable.
    ///
    /// `None` is a silent no-op. Faulty handles are reported through
    /// `tracing` and otherwise ignored; see [`recycle_handle`](Self::recycle_handle).
    /// Only this variable is cleared: other copies of the handle are left as
    /// they are.
    pub fn recycle(&self, handle: &mut Option<Handle<T>>) {
        if let Some(handle) = handle.take() {
            self.recycle_handle(handle);
        }
    }

    /// Destruct the object behind `handle` and return its slot.
    ///
    /// Refused, with a warning and no state change, when:
    /// - the address is not a slot of this pool
    /// - the slot is already free (double recycle)
    /// - the slot was recycled and produced again since `handle` was issued
    pub fn recycle_handle(&self, handle: Handle<T>) {
        let Some(index) = self.slab.index_of(handle.as_ptr()) else {
            if self.config.track_stats {
                self.stats.record_out_of_range();
            }
            warn!(
                pool = %self.config.name,
                address = ?handle.as_ptr(),
                "recycle of a handle outside this pool's range ignored"
            );
            return;
        };

        let mut guard = self.state.lock();
        let PoolState {
            nodes,
            free,
            in_use,
        } = &mut *guard;

        let node = nodes[index];
        if !node.used {
            if self.config.track_stats {
                self.stats.record_double_recycle();
            }
            warn!(
                pool = %self.config.name,
                index,
                address = ?handle.as_ptr(),
                "handle recycled twice, ignored"
            );
            return;
        }
        if node.generation != handle.generation() {
            if self.config.track_stats {
                self.stats.record_stale_handle();
            }
            warn!(
                pool = %self.config.name,
                index,
                expected = node.generation,
                found = handle.generation(),
                "stale handle recycled after its slot was reused, ignored"
            );
            return;
        }

        if let Err(error) = in_use.remove(nodes, index) {
            abort_on(&self.config.name, &error);
        }
        free.push_head(nodes, index);
        let node = &mut nodes[index];
        node.used = false;
        node.generation = node.generation.wrapping_add(1);

        if self.config.track_stats {
            self.stats.record_recycle();
        }
        trace!(pool = %self.config.name, index, "recycled");

        // SAFETY: the node was in use with a matching generation, so the slot
        // holds the live value this handle was issued for. It is now free
        // but we still hold the lock, so it cannot be produced again before
        // the value is gone.
        unsafe { self.slab.drop_in_place(index) };
    }

    /// Produce an object built by `init`, wrapped in a guard that recycles it
    /// on drop.
    pub fn acquire_with<F>(&self, init: F) -> Option<Pooled<'_, T>>
    where
        F: FnOnce() -> T,
    {
        self.produce_with(init)
            .map(|handle| Pooled::new(self, handle))
    }

    /// Whether `handle` still refers to the object it was produced for
    pub fn is_live(&self, handle: &Handle<T>) -> bool {
        let Some(index) = self.slab.index_of(handle.as_ptr()) else {
            return false;
        };
        let node = self.state.lock().nodes[index];
        node.used && node.generation == handle.generation()
    }

    /// Slot index `handle` points at, if it points into this pool at all
    pub fn index_of(&self, handle: &Handle<T>) -> Option<usize> {
        self.slab.index_of(handle.as_ptr())
    }

    /// Whether `handle`'s address falls anywhere inside this pool's storage
    pub fn owns(&self, handle: &Handle<T>) -> bool {
        self.slab.contains(handle.as_ptr())
    }

    /// Total number of slots
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slab.capacity()
    }

    /// Number of free slots
    #[must_use]
    pub fn available(&self) -> usize {
        self.state.lock().free.len()
    }

    /// Number of live objects
    #[must_use]
    pub fn in_use(&self) -> usize {
        self.state.lock().in_use.len()
    }

    /// Whether the next `produce` would return `None`
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.state.lock().free.is_empty()
    }

    /// Pool configuration
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Name used in diagnostics
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Get statistics (if tracking is enabled)
    pub fn stats(&self) -> Option<PoolStatsSnapshot> {
        self.config.track_stats.then(|| self.stats.snapshot())
    }

    /// Walk both lists and verify they partition the slots.
    ///
    /// Checks that every slot is on exactly one list, that `used` matches
    /// list membership, that back links mirror forward links, and that list
    /// lengths match their headers. Takes the lock for the whole walk.
    pub fn check_invariants(&self) -> PoolResult<()> {
        let state = self.state.lock();
        let nodes = &state.nodes[..];
        let mut seen = vec![false; nodes.len()];

        for (list, used) in [(&state.free, false), (&state.in_use, true)] {
            let mut prev = None;
            let mut count = 0;
            for index in list.iter(nodes) {
                let (Some(reached), Some(node)) = (seen.get_mut(index), nodes.get(index)) else {
                    return Err(PoolError::corruption(index, "link points past the last slot"));
                };
                if *reached {
                    return Err(PoolError::corruption(index, "slot reachable twice"));
                }
                *reached = true;
                if node.used != used {
                    return Err(PoolError::corruption(index, "used flag disagrees with list"));
                }
                if node.prev != prev {
                    return Err(PoolError::corruption(index, "back link does not mirror forward link"));
                }
                prev = Some(index);
                count += 1;
            }
            if count != list.len() {
                return Err(PoolError::corruption(
                    list.head().unwrap_or(0),
                    format!("list length is {} but {count} members are linked", list.len()),
                ));
            }
        }

        match seen.iter().position(|&reached| !reached) {
            Some(index) => Err(PoolError::corruption(index, "slot is on neither list")),
            None => Ok(()),
        }
    }
}

impl<T: Default> FixedPool<T> {
    /// Produce a default-constructed object.
    ///
    /// Returns `None` when every slot is in use.
    pub fn produce(&self) -> Option<Handle<T>> {
        self.produce_with(T::default)
    }

    /// Produce a default-constructed object behind a recycling guard.
    pub fn acquire(&self) -> Option<Pooled<'_, T>> {
        self.acquire_with(T::default)
    }
}

impl<T> Drop for FixedPool<T> {
    fn drop(&mut self) {
        let PoolState { nodes, in_use, .. } = self.state.get_mut();
        let resident = in_use.len();
        if resident > 0 {
            warn!(
                pool = %self.config.name,
                resident,
                "pool dropped with objects still in use, destructing them"
            );
        }

        for index in in_use.iter(nodes) {
            // SAFETY: on the in_use list means the slot holds a live value;
            // &mut self means no produce or recycle is in flight.
            unsafe { self.slab.drop_in_place(index) };
        }

        debug!(pool = %self.config.name, "pool dropped");
    }
}

impl<T> fmt::Debug for FixedPool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("FixedPool")
            .field("name", &self.config.name)
            .field("capacity", &self.capacity())
            .field("free", &state.free.len())
            .field("in_use", &state.in_use.len())
            .finish()
    }
}
