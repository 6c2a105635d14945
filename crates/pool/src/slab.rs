//! Contiguous slot storage
//!
//! # Safety
//!
//! `Slab<T>` owns one raw allocation holding `capacity` slots of `T`:
//! - Slots are uninitialized until the pool writes a value into them
//! - The slab never reads, writes or drops a `T` on its own; initialization
//!   state is tracked by the pool's link metadata
//! - Slot `i` lives at `base + i * stride`, where `stride` is the size of
//!   `T` padded to its alignment (one alignment unit for zero-sized `T`, so
//!   every slot keeps a distinct address)
//!
//! ## Invariants
//!
//! - `base` is aligned to `align_of::<T>()` and valid for `stride * capacity`
//!   bytes until drop
//! - `index_of` accepts only addresses on a slot boundary inside the
//!   allocation; everything else is rejected before any dereference

use core::alloc::Layout;
use core::marker::PhantomData;
use core::ptr::NonNull;
use std::alloc;

use crate::error::{PoolError, PoolResult};

/// Fixed array of uninitialized slots for `T`
pub(crate) struct Slab<T> {
    base: NonNull<u8>,
    layout: Layout,
    stride: usize,
    capacity: usize,
    _marker: PhantomData<T>,
}

// SAFETY: Slab<T> is Send if T is Send.
// - The slab owns its allocation exclusively
// - Values stored in slots move with the slab, so T: Send is required
unsafe impl<T: Send> Send for Slab<T> {}

// SAFETY: Slab<T> is Sync if T is Send.
// - &Slab only exposes address arithmetic, never &T
// - The pool hands each live slot to exactly one owner, so no slot is
//   reachable from two threads through the slab
unsafe impl<T: Send> Sync for Slab<T> {}

impl<T> Slab<T> {
    /// Allocate storage for `capacity` slots.
    pub(crate) fn new(capacity: usize) -> PoolResult<Self> {
        if capacity == 0 {
            return Err(PoolError::invalid_capacity(0, crate::config::MAX_CAPACITY));
        }
        let item = Layout::new::<T>();
        let stride = if item.size() == 0 {
            item.align()
        } else {
            item.pad_to_align().size()
        };
        let size = stride
            .checked_mul(capacity)
            .ok_or_else(|| PoolError::size_overflow("slab size", capacity))?;
        let layout = Layout::from_size_align(size, item.align())
            .map_err(|_| PoolError::size_overflow("slab layout", capacity))?;

        // SAFETY: `layout` has non-zero size: stride >= 1 and capacity >= 1.
        let raw = unsafe { alloc::alloc(layout) };
        let base = NonNull::new(raw).ok_or_else(|| PoolError::allocation_failed(layout))?;

        Ok(Self {
            base,
            layout,
            stride,
            capacity,
            _marker: PhantomData,
        })
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    /// Address of slot `index`.
    ///
    /// Panics in debug builds if `index` is out of range.
    #[inline]
    pub(crate) fn slot(&self, index: usize) -> NonNull<T> {
        debug_assert!(index < self.capacity);
        // SAFETY: index < capacity, so the offset stays inside the allocation.
        unsafe { self.base.add(index * self.stride).cast() }
    }

    /// Slot index for `ptr`, or `None` if it is not a slot of this slab.
    #[inline]
    pub(crate) fn index_of(&self, ptr: *const T) -> Option<usize> {
        let offset = ptr.addr().checked_sub(self.base.as_ptr().addr())?;
        if offset >= self.layout.size() || !offset.is_multiple_of(self.stride) {
            return None;
        }
        Some(offset / self.stride)
    }

    /// Whether `ptr` falls inside the slab, boundary or not.
    pub(crate) fn contains(&self, ptr: *const T) -> bool {
        let start = self.base.as_ptr().addr();
        (start..start + self.layout.size()).contains(&ptr.addr())
    }

    /// Move `value` into slot `index`.
    ///
    /// # Safety
    ///
    /// The slot must be uninitialized and exclusively owned by the caller.
    #[inline]
    pub(crate) unsafe fn write(&self, index: usize, value: T) -> NonNull<T> {
        let slot = self.slot(index);
        // SAFETY: slot is in bounds and aligned; the caller guarantees it is
        // vacant, so nothing is overwritten without being dropped.
        unsafe { slot.write(value) };
        slot
    }

    /// Drop the value in slot `index`, leaving it uninitialized.
    ///
    /// # Safety
    ///
    /// The slot must hold a live value that nobody else will touch again.
    #[inline]
    pub(crate) unsafe fn drop_in_place(&self, index: usize) {
        // SAFETY: the caller guarantees the slot is initialized and unaliased.
        unsafe { self.slot(index).drop_in_place() };
    }
}

impl<T> Drop for Slab<T> {
    fn drop(&mut self) {
        // SAFETY: base was returned by alloc::alloc with this exact layout.
        // Live values, if any, are the pool's responsibility and have been
        // dropped (or deliberately leaked) before we get here.
        unsafe { alloc::dealloc(self.base.as_ptr(), self.layout) };
    }
}
