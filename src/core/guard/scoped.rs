/*!
 * Scoped Read/Write Guards
 * Bounds-checked batched access under one lock hold
 */

use super::traits::Guarded;
use crate::core::errors::{ContainerError, ContainerResult};
use crate::core::sync::LockStrategy;
use std::fmt;
use std::ptr;
use std::slice;
use tracing::trace;

/// Shared-lock guard for batched reads
///
/// Holds the container's shared lock from creation until drop. Other
/// readers may hold guards at the same time; writers wait.
#[must_use = "the lock is released as soon as the guard is dropped"]
pub struct ScopedRead<'a, C: Guarded + 'a> {
    container: &'a C,
    _lock: <C::Lock as LockStrategy>::Shared<'a>,
}

impl<'a, C: Guarded + 'a> ScopedRead<'a, C> {
    /// Block until shared access is granted
    pub fn new(container: &'a C) -> Self {
        let lock = container.lock_strategy().acquire_shared();
        Self {
            container,
            _lock: lock,
        }
    }

    /// The locked container
    #[inline]
    pub(crate) fn container(&self) -> &'a C {
        self.container
    }

    /// All live elements
    ///
    /// Hand this to any read-only algorithm; it is valid for the guard's
    /// lifetime only.
    #[inline]
    pub fn as_slice(&self) -> &[C::Item] {
        // SAFETY: shared lock held for as long as `self` is borrowed
        unsafe { self.container.elements() }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    /// Bounds-checked element access
    #[inline]
    pub fn get(&self, pos: usize) -> ContainerResult<&C::Item> {
        let elements = self.as_slice();
        ContainerError::check_index(pos, elements.len())?;
        Ok(&elements[pos])
    }

    pub fn front(&self) -> ContainerResult<&C::Item> {
        self.get(0)
    }

    pub fn back(&self) -> ContainerResult<&C::Item> {
        self.get(self.len().saturating_sub(1))
    }

    /// Double-ended iterator; use `.rev()` for reverse iteration
    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, C::Item> {
        self.as_slice().iter()
    }

    /// Release the lock now instead of at end of scope
    pub fn unlock(self) {}
}

impl<'a, 'g, C: Guarded + 'a> IntoIterator for &'g ScopedRead<'a, C> {
    type Item = &'g C::Item;
    type IntoIter = slice::Iter<'g, C::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, C: Guarded + 'a> fmt::Debug for ScopedRead<'a, C>
where
    C::Item: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ScopedRead").field(&self.as_slice()).finish()
    }
}

/// Exclusive-lock guard for batched reads and writes
///
/// Holds the container's exclusive lock from creation until drop. Generic
/// algorithms that mutate in place (`sort`, `reverse`, ...) run on
/// `as_mut_slice()` while the guard is alive.
#[must_use = "the lock is released as soon as the guard is dropped"]
pub struct ScopedWrite<'a, C: Guarded + 'a> {
    container: &'a C,
    _lock: <C::Lock as LockStrategy>::Exclusive<'a>,
}

impl<'a, C: Guarded + 'a> ScopedWrite<'a, C> {
    /// Block until exclusive access is granted
    pub fn new(container: &'a C) -> Self {
        let lock = container.lock_strategy().acquire_exclusive();
        Self {
            container,
            _lock: lock,
        }
    }

    /// The locked container
    #[inline]
    pub(crate) fn container(&self) -> &'a C {
        self.container
    }

    #[inline]
    pub fn as_slice(&self) -> &[C::Item] {
        // SAFETY: exclusive lock held for as long as `self` is borrowed
        unsafe { self.container.elements() }
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [C::Item] {
        // SAFETY: exclusive lock held and `self` is mutably borrowed, so no
        // other slice from this guard is alive
        unsafe { self.container.elements_mut() }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    #[inline]
    pub fn get(&self, pos: usize) -> ContainerResult<&C::Item> {
        let elements = self.as_slice();
        ContainerError::check_index(pos, elements.len())?;
        Ok(&elements[pos])
    }

    #[inline]
    pub fn get_mut(&mut self, pos: usize) -> ContainerResult<&mut C::Item> {
        let elements = self.as_mut_slice();
        ContainerError::check_index(pos, elements.len())?;
        Ok(&mut elements[pos])
    }

    /// Overwrite one element, returning the previous value
    pub fn set(&mut self, pos: usize, value: C::Item) -> ContainerResult<C::Item> {
        Ok(std::mem::replace(self.get_mut(pos)?, value))
    }

    pub fn front(&self) -> ContainerResult<&C::Item> {
        self.get(0)
    }

    pub fn back(&self) -> ContainerResult<&C::Item> {
        self.get(self.len().saturating_sub(1))
    }

    pub fn front_mut(&mut self) -> ContainerResult<&mut C::Item> {
        self.get_mut(0)
    }

    pub fn back_mut(&mut self) -> ContainerResult<&mut C::Item> {
        let last = self.len().saturating_sub(1);
        self.get_mut(last)
    }

    /// Overwrite every element with a clone of `value`
    pub fn fill(&mut self, value: C::Item)
    where
        C::Item: Clone,
    {
        self.as_mut_slice().fill(value);
    }

    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, C::Item> {
        self.as_slice().iter()
    }

    #[inline]
    pub fn iter_mut(&mut self) -> slice::IterMut<'_, C::Item> {
        self.as_mut_slice().iter_mut()
    }

    /// Release the lock now instead of at end of scope
    pub fn unlock(self) {}
}

impl<'a, 'g, C: Guarded + 'a> IntoIterator for &'g ScopedWrite<'a, C> {
    type Item = &'g C::Item;
    type IntoIter = slice::Iter<'g, C::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, 'g, C: Guarded + 'a> IntoIterator for &'g mut ScopedWrite<'a, C> {
    type Item = &'g mut C::Item;
    type IntoIter = slice::IterMut<'g, C::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<'a, C: Guarded + 'a> fmt::Debug for ScopedWrite<'a, C>
where
    C::Item: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ScopedWrite").field(&self.as_slice()).finish()
    }
}

/// Exclusive guards on two containers, acquired deadlock-free
///
/// Locks are always taken lower address first, whichever argument comes
/// first, so `lock_pair(a, b)` racing `lock_pair(b, a)` cannot deadlock.
/// Guards are returned in argument order. Returns `None` when both
/// arguments are the same container, since one container cannot hand out
/// two exclusive guards.
pub fn lock_pair<'a, C: Guarded + 'a>(
    first: &'a C,
    second: &'a C,
) -> Option<(ScopedWrite<'a, C>, ScopedWrite<'a, C>)> {
    if ptr::eq(first, second) {
        return None;
    }

    let first_addr = first as *const C as usize;
    let second_addr = second as *const C as usize;

    if first_addr < second_addr {
        trace!(low = first_addr, high = second_addr, "locking pair in argument order");
        let a = ScopedWrite::new(first);
        let b = ScopedWrite::new(second);
        Some((a, b))
    } else {
        trace!(low = second_addr, high = first_addr, "locking pair in reverse order");
        let b = ScopedWrite::new(second);
        let a = ScopedWrite::new(first);
        Some((a, b))
    }
}

/// Shared guards on two distinct containers, acquired in address order
///
/// Writers queue behind readers, so two readers taking locks in opposite
/// orders can still deadlock against a waiting writer; the ordering rule
/// applies to shared pairs too.
pub(crate) fn read_pair<'a, C: Guarded + 'a>(
    first: &'a C,
    second: &'a C,
) -> Option<(ScopedRead<'a, C>, ScopedRead<'a, C>)> {
    if ptr::eq(first, second) {
        return None;
    }

    if (first as *const C as usize) < (second as *const C as usize) {
        let a = ScopedRead::new(first);
        let b = ScopedRead::new(second);
        Some((a, b))
    } else {
        let b = ScopedRead::new(second);
        let a = ScopedRead::new(first);
        Some((a, b))
    }
}
