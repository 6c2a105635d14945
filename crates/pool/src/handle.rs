//! Raw handles to produced slots

use core::fmt;
use core::hash::{Hash, Hasher};
use core::ptr::NonNull;

/// Caller-held reference to a produced slot.
///
/// A handle is a slot address plus the generation the slot had when it was
/// produced. It is `Copy`, so aliases behave exactly like raw pointers: the
/// pool cannot stop a second alias from being used after recycle, but it
/// does notice when one is *recycled* after its slot was produced again
/// (generation mismatch) and refuses it with a warning.
///
/// Dereferencing is `unsafe`; prefer [`FixedPool::acquire`] and the
/// [`Pooled`] guard unless raw lifetimes are required.
///
/// [`FixedPool::acquire`]: crate::FixedPool::acquire
/// [`Pooled`]: crate::Pooled
pub struct Handle<T> {
    ptr: NonNull<T>,
    generation: u32,
}

// SAFETY: Handle<T> is Send if T is Send.
// - A handle is an address plus a counter; sending it moves the logical
//   ownership of the slot's value, which requires T: Send
unsafe impl<T: Send> Send for Handle<T> {}

// SAFETY: Handle<T> is Sync if T is Sync.
// - Through &Handle only `as_ref` can reach the value, yielding &T
unsafe impl<T: Sync> Sync for Handle<T> {}

impl<T> Handle<T> {
    /// Build a handle from raw parts.
    ///
    /// Any value is accepted; the pool validates the address on recycle.
    pub fn from_raw_parts(ptr: NonNull<T>, generation: u32) -> Self {
        Self { ptr, generation }
    }

    /// Split into raw parts.
    pub fn into_raw_parts(self) -> (NonNull<T>, u32) {
        (self.ptr, self.generation)
    }

    /// Address of the slot
    #[inline]
    pub fn as_ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Generation the slot had when this handle was produced
    #[inline]
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Shared reference to the produced object.
    ///
    /// # Safety
    ///
    /// The handle must be live (not yet recycled, pool not dropped) and no
    /// mutable reference to the object may exist for `'a`.
    #[inline]
    pub unsafe fn as_ref<'a>(&self) -> &'a T {
        // SAFETY: upheld by the caller.
        unsafe { self.ptr.as_ref() }
    }

    /// Exclusive reference to the produced object.
    ///
    /// # Safety
    ///
    /// The handle must be live and no other reference to the object may exist
    /// for `'a`.
    #[inline]
    pub unsafe fn as_mut<'a>(&mut self) -> &'a mut T {
        // SAFETY: upheld by the caller.
        unsafe { self.ptr.as_mut() }
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr == other.ptr && self.generation == other.generation
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ptr.hash(state);
        self.generation.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("ptr", &self.ptr)
            .field("generation", &self.generation)
            .finish()
    }
}
