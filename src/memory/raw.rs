/*!
 * Raw Buffers
 * Owned allocations and the rollback-on-drop construction tracker
 */

use super::traits::Allocator;
use crate::core::errors::ContainerResult;
use std::mem::ManuallyDrop;
use std::ptr::{self, NonNull};
use tracing::trace;

/// Owned, uninitialized storage for up to `cap` values
///
/// Tracks the allocation only, never which slots are live. Dropping it
/// releases the memory without touching the contents, so whoever constructed
/// elements must destroy them first. A null buffer (`ptr == None`) owns no
/// memory and is never passed to `deallocate`.
pub(crate) struct RawBuffer<T, A: Allocator<T>> {
    ptr: Option<NonNull<T>>,
    cap: usize,
    alloc: A,
}

impl<T, A: Allocator<T>> RawBuffer<T, A> {
    /// Null buffer with capacity 0
    #[inline]
    pub fn new_in(alloc: A) -> Self {
        Self {
            ptr: None,
            cap: 0,
            alloc,
        }
    }

    /// Allocate exactly `cap` slots; `cap == 0` stays null
    pub fn allocate_in(cap: usize, alloc: A) -> ContainerResult<Self> {
        if cap == 0 {
            return Ok(Self::new_in(alloc));
        }
        let ptr = alloc.allocate(cap)?;
        trace!(capacity = cap, "allocated buffer");
        Ok(Self {
            ptr: Some(ptr),
            cap,
            alloc,
        })
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.cap
    }

    #[inline]
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.ptr.is_none()
    }

    /// Start of the buffer, dangling when null
    #[inline]
    pub fn as_ptr(&self) -> *mut T {
        self.ptr.map_or(NonNull::dangling().as_ptr(), NonNull::as_ptr)
    }

    /// Pointer to slot `index`
    ///
    /// # Safety
    ///
    /// `index < capacity()`.
    #[inline]
    pub unsafe fn slot(&self, index: usize) -> NonNull<T> {
        debug_assert!(index < self.cap);
        NonNull::new_unchecked(self.as_ptr().add(index))
    }

    /// Move the first `len` values into a fresh allocation of `new_cap` slots
    ///
    /// Values are relocated bitwise, which cannot fail. On allocation failure
    /// the buffer is untouched.
    ///
    /// # Safety
    ///
    /// Exactly the first `len` slots are live and `len <= new_cap`.
    pub unsafe fn relocate(&mut self, len: usize, new_cap: usize) -> ContainerResult<()> {
        debug_assert!(len <= new_cap && len <= self.cap);
        let mut fresh = Self::allocate_in(new_cap, self.alloc.clone())?;
        if len > 0 {
            ptr::copy_nonoverlapping(self.as_ptr(), fresh.as_ptr(), len);
        }
        trace!(from = self.cap, to = new_cap, len, "relocated buffer");
        // Old allocation is released by `fresh` going out of scope
        std::mem::swap(self, &mut fresh);
        Ok(())
    }

    /// Drop the values in `[from, to)` in reverse order
    ///
    /// # Safety
    ///
    /// Those slots are live and are not used again.
    pub unsafe fn destroy_range(&self, from: usize, to: usize) {
        for index in (from..to).rev() {
            self.alloc.destroy(self.slot(index));
        }
    }
}

impl<T, A: Allocator<T>> Drop for RawBuffer<T, A> {
    fn drop(&mut self) {
        if let Some(ptr) = self.ptr.take() {
            // SAFETY: ptr came from allocate(self.cap) on self.alloc
            unsafe { self.alloc.deallocate(ptr, self.cap) };
            trace!(capacity = self.cap, "released buffer");
        }
    }
}

/// Two-phase construction tracker
///
/// Wraps a freshly allocated buffer and counts constructed elements. Until
/// `finish` is called, dropping it (error return or unwinding panic)
/// destroys every constructed element in reverse order and then releases
/// the buffer.
pub(crate) struct PartialFill<T, A: Allocator<T>> {
    raw: RawBuffer<T, A>,
    initialized: usize,
}

impl<T, A: Allocator<T>> PartialFill<T, A> {
    pub fn new(raw: RawBuffer<T, A>) -> Self {
        Self {
            raw,
            initialized: 0,
        }
    }

    /// Allocate `cap` slots and start tracking
    pub fn allocate_in(cap: usize, alloc: A) -> ContainerResult<Self> {
        Ok(Self::new(RawBuffer::allocate_in(cap, alloc)?))
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.initialized == self.raw.capacity()
    }

    /// Construct the next element
    ///
    /// # Panics
    ///
    /// Panics if every slot is already constructed.
    #[inline]
    pub fn push(&mut self, value: T) {
        assert!(!self.is_full(), "construction past buffer capacity");
        // SAFETY: slot `initialized` is allocated and not yet constructed
        unsafe {
            let slot = self.raw.slot(self.initialized);
            self.raw.allocator().construct(slot, value);
        }
        self.initialized += 1;
    }

    /// Stop tracking and hand over the buffer plus the live element count
    pub fn finish(self) -> (RawBuffer<T, A>, usize) {
        let this = ManuallyDrop::new(self);
        // SAFETY: `this` is never dropped, so `raw` is moved out exactly once
        let raw = unsafe { ptr::read(&this.raw) };
        (raw, this.initialized)
    }
}

impl<T, A: Allocator<T>> Drop for PartialFill<T, A> {
    fn drop(&mut self) {
        // SAFETY: exactly the first `initialized` slots are live
        unsafe { self.raw.destroy_range(0, self.initialized) };
    }
}
