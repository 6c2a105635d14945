//! RAII wrapper for produced objects

use core::fmt;
use core::mem::ManuallyDrop;
use core::ops::{Deref, DerefMut};

use crate::handle::Handle;
use crate::pool::FixedPool;

/// Guard that recycles its object when dropped
///
/// Borrows the pool, so the pool cannot be dropped while the guard lives.
///
/// # Example
/// ```
/// use slotpool::FixedPool;
///
/// let pool = FixedPool::<String>::new(4);
/// {
///     let mut name = pool.acquire().unwrap();
///     name.push_str("slot");
///     assert_eq!(pool.in_use(), 1);
/// }
/// assert_eq!(pool.in_use(), 0);
/// ```
pub struct Pooled<'a, T> {
    handle: Handle<T>,
    pool: &'a FixedPool<T>,
}

impl<'a, T> Pooled<'a, T> {
    pub(crate) fn new(pool: &'a FixedPool<T>, handle: Handle<T>) -> Self {
        Self { handle, pool }
    }

    /// Detach into a raw handle; the object is no longer recycled on drop.
    pub fn into_handle(self) -> Handle<T> {
        let this = ManuallyDrop::new(self);
        this.handle
    }

    /// Copy of the guarded slot's handle
    ///
    /// # Safety
    ///
    /// The copy must not be recycled while the guard is alive: the guard
    /// keeps dereferencing the slot until it drops. Use
    /// [`into_handle`](Self::into_handle) to take the handle out instead.
    ///
    /// ```compile_fail,E0133
    /// let pool = slotpool::FixedPool::<u8>::new(1);
    /// let guard = pool.acquire().unwrap();
    /// pool.recycle_handle(guard.handle());
    /// ```
    pub unsafe fn handle(&self) -> Handle<T> {
        self.handle
    }

    /// Get reference to the pool
    pub fn pool(&self) -> &'a FixedPool<T> {
        self.pool
    }
}

impl<T> Deref for Pooled<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: the guard is the only owner of a live handle; recycle
        // happens only in Drop, after the last borrow of self.
        unsafe { self.handle.as_ref() }
    }
}

impl<T> DerefMut for Pooled<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: &mut self gives exclusive access to the slot.
        unsafe { self.handle.as_mut() }
    }
}

impl<T> Drop for Pooled<'_, T> {
    fn drop(&mut self) {
        self.pool.recycle_handle(self.handle);
    }
}

impl<T: fmt::Debug> fmt::Debug for Pooled<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pooled").field(&**self).finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::FixedPool;

    #[test]
    fn guard_recycles_on_drop() {
        let pool = FixedPool::<Vec<u32>>::new(1);
        {
            let mut items = pool.acquire().unwrap();
            items.extend([1, 2, 3]);
            assert_eq!(items.len(), 3);
            assert!(pool.acquire().is_none());
        }
        assert_eq!(pool.available(), 1);

        let fresh = pool.acquire().unwrap();
        assert!(fresh.is_empty());
    }

    #[test]
    fn into_handle_detaches() {
        let pool = FixedPool::<u64>::new(2);
        let handle = pool.acquire_with(|| 42).unwrap().into_handle();

        assert!(pool.is_live(&handle));
        assert_eq!(unsafe { *handle.as_ref() }, 42);
        assert_eq!(pool.in_use(), 1);

        pool.recycle_handle(handle);
        assert_eq!(pool.in_use(), 0);
    }

    #[test]
    fn guard_points_at_its_pool() {
        let pool = FixedPool::<u8>::new(2);
        let a = pool.acquire().unwrap();
        let b = pool.acquire().unwrap();
        assert!(core::ptr::eq(a.pool(), &pool));
        assert!(core::ptr::eq(a.pool(), b.pool()));
        assert_ne!(unsafe { a.handle() }, unsafe { b.handle() });
    }

    #[test]
    fn early_recycle_goes_through_into_handle() {
        let pool = FixedPool::<u32>::new(1);
        let guard = pool.acquire_with(|| 1).unwrap();
        let handle = guard.into_handle();
        pool.recycle_handle(handle);

        let other = pool.acquire_with(|| 42).unwrap();
        assert_eq!(*other, 42);
        assert!(!pool.is_live(&handle));
        assert_eq!(pool.in_use(), 1);

        drop(other);
        assert_eq!(pool.in_use(), 0);
    }

    #[test]
    fn debug_shows_value() {
        let pool = FixedPool::<u8>::new(1);
        let value = pool.acquire_with(|| 7).unwrap();
        assert_eq!(format!("{value:?}"), "Pooled(7)");
    }
}
