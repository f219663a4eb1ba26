/*!
 * Memory Traits
 * Allocator capability used by the dynamic array
 */

use crate::core::errors::ContainerResult;
use std::ptr::{self, NonNull};

/// Typed allocator interface
///
/// Separates obtaining storage from constructing values in it, so a
/// container can account for both halves independently. Clones of an
/// allocator must be able to free each other's allocations; `PartialEq`
/// reports exactly that interchangeability.
pub trait Allocator<T>: Clone + PartialEq {
    /// Allocate uninitialized storage for `n` values of `T`
    fn allocate(&self, n: usize) -> ContainerResult<NonNull<T>>;

    /// Release storage obtained from `allocate`
    ///
    /// # Safety
    ///
    /// `ptr` must come from `allocate(n)` on this allocator (or one equal to
    /// it), with the same `n`, and must not have been released already.
    unsafe fn deallocate(&self, ptr: NonNull<T>, n: usize);

    /// Move `value` into an uninitialized slot
    ///
    /// # Safety
    ///
    /// `slot` must be valid for writes and hold no live value.
    #[inline]
    unsafe fn construct(&self, slot: NonNull<T>, value: T) {
        ptr::write(slot.as_ptr(), value);
    }

    /// Drop the value in `slot`, leaving it uninitialized
    ///
    /// # Safety
    ///
    /// `slot` must hold a live value that is not used afterwards.
    #[inline]
    unsafe fn destroy(&self, slot: NonNull<T>) {
        ptr::drop_in_place(slot.as_ptr());
    }

    /// Allocator a copy of a container should use
    fn select_on_copy(&self) -> Self {
        self.clone()
    }
}
