/*!
 * Vector Construction
 *
 * Every bulk constructor follows the same two-phase protocol: allocate the
 * exact capacity, then construct through a `PartialFill`. A failing element
 * (error or panic) rolls back everything built so far before the failure
 * reaches the caller.
 */

use super::ConcurrentVec;
use crate::core::errors::{ContainerError, ContainerResult};
use crate::core::sync::{LockStrategy, RwLockStrategy};
use crate::memory::{Allocator, Global, PartialFill, RawBuffer};
use std::mem;
use std::ptr;
use tracing::trace;

impl<T> ConcurrentVec<T> {
    /// Empty vector, null buffer, capacity 0; allocates nothing
    pub fn new() -> Self {
        Self::new_in(Global)
    }

    /// `count` clones of `value`
    pub fn from_elem(count: usize, value: T) -> ContainerResult<Self>
    where
        T: Clone,
    {
        Self::from_elem_in(count, value, Global)
    }

    /// `count` default-constructed elements
    pub fn with_len(count: usize) -> ContainerResult<Self>
    where
        T: Default,
    {
        Self::with_len_in(count, Global)
    }

    /// `count` elements produced by `f(index)`
    pub fn from_fn<F>(count: usize, f: F) -> ContainerResult<Self>
    where
        F: FnMut(usize) -> T,
    {
        Self::from_fn_in(count, Global, f)
    }

    /// `count` elements produced by a fallible `f(index)`
    ///
    /// The first `Err` destroys the elements built so far (last first),
    /// releases the buffer and is returned unchanged.
    pub fn try_from_fn<F, E>(count: usize, f: F) -> Result<Self, E>
    where
        F: FnMut(usize) -> Result<T, E>,
        E: From<ContainerError>,
    {
        Self::try_from_fn_in(count, Global, f)
    }

    /// Exactly `iter.len()` slots, filled from the iterator
    pub fn from_iter_exact<I>(iter: I) -> ContainerResult<Self>
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
    {
        Self::from_iter_exact_in(iter, Global)
    }
}

impl<T, L: LockStrategy> ConcurrentVec<T, Global, L> {
    /// Empty vector protected by the given strategy instance
    pub fn with_strategy(lock: L) -> Self {
        Self::with_strategy_in(Global, lock)
    }
}

impl<T, A: Allocator<T>> ConcurrentVec<T, A, RwLockStrategy> {
    /// Empty vector using `alloc`; allocates nothing
    pub fn new_in(alloc: A) -> Self {
        Self::with_strategy_in(alloc, RwLockStrategy::default())
    }

    pub fn from_elem_in(count: usize, value: T, alloc: A) -> ContainerResult<Self>
    where
        T: Clone,
    {
        Self::from_fn_in(count, alloc, |_| value.clone())
    }

    pub fn with_len_in(count: usize, alloc: A) -> ContainerResult<Self>
    where
        T: Default,
    {
        Self::from_fn_in(count, alloc, |_| T::default())
    }

    pub fn from_fn_in<F>(count: usize, alloc: A, mut f: F) -> ContainerResult<Self>
    where
        F: FnMut(usize) -> T,
    {
        Self::try_from_fn_in(count, alloc, |i| Ok::<T, ContainerError>(f(i)))
    }

    pub fn try_from_fn_in<F, E>(count: usize, alloc: A, f: F) -> Result<Self, E>
    where
        F: FnMut(usize) -> Result<T, E>,
        E: From<ContainerError>,
    {
        Self::build(count, alloc, RwLockStrategy::default(), f)
    }

    /// Exactly `iter.len()` slots; a short iterator leaves the rest
    /// unconstructed, extra items are not consumed
    pub fn from_iter_exact_in<I>(iter: I, alloc: A) -> ContainerResult<Self>
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
    {
        let iter = iter.into_iter();
        let cap = iter.len();
        let mut fill = PartialFill::allocate_in(cap, alloc)?;
        for value in iter.take(cap) {
            fill.push(value);
        }
        let (raw, len) = fill.finish();
        Ok(Self::from_raw(raw, len, RwLockStrategy::default()))
    }

    /// Clones of the elements of `values`
    pub fn from_slice_in(values: &[T], alloc: A) -> ContainerResult<Self>
    where
        T: Clone,
    {
        Self::from_iter_exact_in(values.iter().cloned(), alloc)
    }
}

impl<T, A: Allocator<T>, L: LockStrategy> ConcurrentVec<T, A, L> {
    /// Empty vector with explicit allocator and strategy
    pub fn with_strategy_in(alloc: A, lock: L) -> Self {
        Self::from_raw(RawBuffer::new_in(alloc), 0, lock)
    }

    /// Allocate `count` slots and construct each from `f(index)`
    pub(crate) fn build<F, E>(count: usize, alloc: A, lock: L, mut f: F) -> Result<Self, E>
    where
        F: FnMut(usize) -> Result<T, E>,
        E: From<ContainerError>,
    {
        let mut fill = PartialFill::allocate_in(count, alloc)?;
        for index in 0..count {
            // An early return drops `fill`, which undoes the first `index`
            fill.push(f(index)?);
        }
        let (raw, len) = fill.finish();
        Ok(Self::from_raw(raw, len, lock))
    }

    /// Re-protect the same buffer with another strategy
    pub fn into_strategy<M: LockStrategy>(self, lock: M) -> ConcurrentVec<T, A, M> {
        let growth = self.growth;
        let (raw, len) = self.into_raw();
        ConcurrentVec::from_raw(raw, len, lock).with_growth_policy(growth)
    }

    /// Disassemble without dropping elements
    fn into_raw(self) -> (RawBuffer<T, A>, usize) {
        let mut this = mem::ManuallyDrop::new(self);
        let len = *this.len.get_mut();
        // SAFETY: `this` is never dropped; each field is read or dropped once
        unsafe {
            ptr::drop_in_place(&mut this.lock);
            (ptr::read(this.raw.get()), len)
        }
    }

    /// Copy with `alloc`, sized to the live range
    ///
    /// Holds the source's shared lock while copying. A panicking `clone`
    /// rolls back the partial copy.
    pub fn clone_in(&self, alloc: A) -> ContainerResult<Self>
    where
        T: Clone,
        L: Default,
    {
        let read = self.new_scoped_read();
        let source = read.as_slice();
        let mut fill = PartialFill::allocate_in(source.len(), alloc)?;
        for value in source {
            fill.push(value.clone());
        }
        let (raw, len) = fill.finish();
        Ok(Self::from_raw(raw, len, L::default()).with_growth_policy(self.growth))
    }

    /// Copy using the allocator's copy-construction choice
    pub fn try_clone(&self) -> ContainerResult<Self>
    where
        T: Clone,
        L: Default,
    {
        self.clone_in(self.allocator().select_on_copy())
    }

    /// Move the whole buffer out in O(1)
    ///
    /// The returned vector owns the original allocation (element addresses
    /// are unchanged). `self` is left empty with a null buffer and
    /// capacity 0.
    pub fn take(&self) -> Self
    where
        L: Default,
    {
        let _write = self.new_scoped_write();
        // SAFETY: exclusive lock held and no slice is alive
        let raw = unsafe { self.raw_mut() };
        let len = self.len();
        let empty = RawBuffer::new_in(raw.allocator().clone());
        let taken = mem::replace(raw, empty);
        self.set_cursors(0, 0);
        trace!(len, capacity = taken.capacity(), "moved buffer out");
        Self::from_raw(taken, len, L::default()).with_growth_policy(self.growth)
    }

    /// Allocator-extended move
    ///
    /// If `alloc` equals the current allocator this is `take`: O(1), `self`
    /// left null. Otherwise fresh storage of the same capacity is allocated
    /// from `alloc` and each element is moved across individually; `self`
    /// keeps its (now empty) buffer and capacity. On allocation failure
    /// `self` is untouched.
    pub fn take_in(&self, alloc: A) -> ContainerResult<Self>
    where
        L: Default,
    {
        let _write = self.new_scoped_write();
        // SAFETY: exclusive lock held and no slice is alive
        let raw = unsafe { self.raw_mut() };
        let len = self.len();

        if *raw.allocator() == alloc {
            let taken = mem::replace(raw, RawBuffer::new_in(alloc));
            self.set_cursors(0, 0);
            trace!(len, "moved buffer out, allocators equal");
            return Ok(Self::from_raw(taken, len, L::default()).with_growth_policy(self.growth));
        }

        let cap = raw.capacity();
        let mut fill = PartialFill::allocate_in(cap, alloc)?;
        // From here on the source no longer owns its elements
        self.set_cursors(0, cap);
        for index in 0..len {
            // SAFETY: slot `index` was live and is read exactly once
            let value = unsafe { ptr::read(raw.slot(index).as_ptr()) };
            fill.push(value);
        }
        let (fresh, moved) = fill.finish();
        trace!(len = moved, capacity = cap, "moved elements into new allocator");
        Ok(Self::from_raw(fresh, moved, L::default()).with_growth_policy(self.growth))
    }
}
