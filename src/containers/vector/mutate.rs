/*!
 * Vector Mutation
 *
 * Structural changes (growth, shrinking, element count) run only under the
 * exclusive lock. The `*_locked` primitives assume it is held; the public
 * methods on the vector take a write guard around them, and the write-guard
 * extensions reuse the guard the caller already holds.
 */

use super::ConcurrentVec;
use crate::core::errors::{ContainerError, ContainerResult};
use crate::core::guard::{lock_pair, ScopedWrite};
use crate::core::sync::LockStrategy;
use crate::memory::{Allocator, RawBuffer};
use std::mem;
use std::ptr;
use tracing::trace;

impl<T, A: Allocator<T>, L: LockStrategy> ConcurrentVec<T, A, L> {
    /// Grow so at least `required` slots exist
    ///
    /// # Safety
    ///
    /// Exclusive lock held and no slice into the buffer alive.
    unsafe fn grow_locked(&self, required: usize) -> ContainerResult<()> {
        let len = self.len();
        let cap = self.capacity();
        if required <= cap {
            return Ok(());
        }
        let new_cap = self
            .growth
            .next_capacity(cap, required)
            .ok_or(ContainerError::CapacityOverflow { requested: required })?;
        self.raw_mut().relocate(len, new_cap)?;
        trace!(from = cap, to = new_cap, "grew vector");
        self.set_cursors(len, new_cap);
        Ok(())
    }

    /// # Safety
    ///
    /// Exclusive lock held and no slice into the buffer alive.
    unsafe fn push_locked(&self, value: T) -> ContainerResult<()> {
        let len = self.len();
        let required = len
            .checked_add(1)
            .ok_or(ContainerError::CapacityOverflow { requested: len })?;
        self.grow_locked(required)?;

        let raw = self.raw();
        raw.allocator().construct(raw.slot(len), value);
        self.set_cursors(len + 1, raw.capacity());
        Ok(())
    }

    /// # Safety
    ///
    /// Exclusive lock held and no slice into the buffer alive.
    unsafe fn pop_locked(&self) -> Option<T> {
        let len = self.len();
        if len == 0 {
            return None;
        }
        let raw = self.raw();
        self.set_cursors(len - 1, raw.capacity());
        Some(ptr::read(raw.slot(len - 1).as_ptr()))
    }

    /// # Safety
    ///
    /// Exclusive lock held and no slice into the buffer alive.
    unsafe fn truncate_locked(&self, new_len: usize) {
        let len = self.len();
        if new_len >= len {
            return;
        }
        let raw = self.raw();
        // Shrink first: a panicking destructor leaks the tail, never revisits it
        self.set_cursors(new_len, raw.capacity());
        raw.destroy_range(new_len, len);
    }

    /// # Safety
    ///
    /// Exclusive lock held and no slice into the buffer alive.
    unsafe fn reserve_locked(&self, additional: usize) -> ContainerResult<()> {
        let len = self.len();
        let required = len
            .checked_add(additional)
            .ok_or(ContainerError::CapacityOverflow { requested: additional })?;
        self.grow_locked(required)
    }

    /// # Safety
    ///
    /// Exclusive lock held and no slice into the buffer alive.
    unsafe fn shrink_to_fit_locked(&self) -> ContainerResult<()> {
        let len = self.len();
        let cap = self.capacity();
        if len == cap {
            return Ok(());
        }
        let raw = self.raw_mut();
        if len == 0 {
            let alloc = raw.allocator().clone();
            drop(mem::replace(raw, RawBuffer::new_in(alloc)));
        } else {
            raw.relocate(len, len)?;
        }
        trace!(from = cap, to = len, "shrank vector");
        self.set_cursors(len, len);
        Ok(())
    }

    /// Append one element, growing the buffer when full
    ///
    /// On allocation failure the vector is unchanged and `value` is dropped.
    pub fn push(&self, value: T) -> ContainerResult<()> {
        self.new_scoped_write().push(value)
    }

    /// Remove and return the last element
    pub fn pop(&self) -> Option<T> {
        self.new_scoped_write().pop()
    }

    /// Make room for at least `additional` more elements
    pub fn reserve(&self, additional: usize) -> ContainerResult<()> {
        self.new_scoped_write().reserve(additional)
    }

    /// Destroy every element, keeping the capacity
    pub fn clear(&self) {
        self.new_scoped_write().clear();
    }

    /// Destroy elements past `new_len`; no-op if already shorter
    pub fn truncate(&self, new_len: usize) {
        self.new_scoped_write().truncate(new_len);
    }

    /// Reduce capacity to the live length; an empty vector becomes null
    pub fn shrink_to_fit(&self) -> ContainerResult<()> {
        self.new_scoped_write().shrink_to_fit()
    }

    /// Overwrite the element at `pos`, under an exclusive lock
    pub fn set(&self, pos: usize, value: T) -> ContainerResult<()> {
        self.new_scoped_write().set(pos, value).map(drop)
    }

    /// Overwrite every live element in one critical section
    pub fn fill(&self, value: T)
    where
        T: Clone,
    {
        self.new_scoped_write().fill(value);
    }

    /// Exchange buffers, cursors and allocators with `other`
    ///
    /// Both locks are taken in address order, so opposite-direction swaps
    /// cannot deadlock. Elements are not touched. Swapping with itself does
    /// nothing.
    pub fn swap(&self, other: &Self) {
        let Some((mine, theirs)) = lock_pair(self, other) else {
            return;
        };
        // SAFETY: both exclusive locks held; no slices borrowed from the guards
        unsafe {
            mem::swap(self.raw_mut(), other.raw_mut());
        }
        let (len, cap) = (self.len(), self.capacity());
        self.set_cursors(other.len(), other.capacity());
        other.set_cursors(len, cap);
        drop((mine, theirs));
    }

    /// Replace the contents with a copy of `other`
    ///
    /// The copy is built before the lock on `self` is taken, so a failed
    /// copy leaves `self` untouched. The old contents are dropped after the
    /// lock is released.
    pub fn assign_from(&self, other: &Self) -> ContainerResult<()>
    where
        T: Clone,
        L: Default,
    {
        if ptr::eq(self, other) {
            return Ok(());
        }
        let copy = other.clone_in(self.allocator())?;
        self.swap(&copy);
        Ok(())
    }
}

impl<T, A: Allocator<T>, L: LockStrategy> ScopedWrite<'_, ConcurrentVec<T, A, L>> {
    /// Append one element under the held lock
    pub fn push(&mut self, value: T) -> ContainerResult<()> {
        // SAFETY: exclusive lock held; `&mut self` excludes live slices
        unsafe { self.container().push_locked(value) }
    }

    pub fn pop(&mut self) -> Option<T> {
        // SAFETY: as for `push`
        unsafe { self.container().pop_locked() }
    }

    pub fn reserve(&mut self, additional: usize) -> ContainerResult<()> {
        // SAFETY: as for `push`
        unsafe { self.container().reserve_locked(additional) }
    }

    pub fn clear(&mut self) {
        // SAFETY: as for `push`
        unsafe { self.container().truncate_locked(0) }
    }

    pub fn truncate(&mut self, new_len: usize) {
        // SAFETY: as for `push`
        unsafe { self.container().truncate_locked(new_len) }
    }

    pub fn shrink_to_fit(&mut self) -> ContainerResult<()> {
        // SAFETY: as for `push`
        unsafe { self.container().shrink_to_fit_locked() }
    }
}
