/*!
 * Concurrent Dynamic Array
 *
 * Thread-safe growable array with pluggable allocator and lock strategy.
 *
 * ## Storage
 *
 * One `RawBuffer` (start pointer, capacity, allocator) plus two published
 * cursors:
 * - `len`: one past the last constructed element
 * - `cap`: one past the last allocated slot
 *
 * Invariant: `len <= cap`, slots `[0, len)` are live, `[len, cap)` are
 * allocated but uninitialized. A buffer with capacity 0 is null and is
 * never handed to `deallocate`.
 *
 * The buffer is only touched while the container's lock is held. The
 * cursors are atomics so `len()` / `capacity()` can be read without
 * locking; a consistent view across several calls still needs a guard.
 */

mod construct;
mod mutate;

use crate::core::errors::ContainerResult;
use crate::core::guard::{read_pair, Guarded, ScopedRead, ScopedWrite};
use crate::core::sync::{GrowthPolicy, LockStrategy, RwLockStrategy};
use crate::memory::{Allocator, Global, RawBuffer};
use std::cell::UnsafeCell;
use std::fmt;
use std::marker::PhantomData;
use std::slice;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::trace;

/// Thread-safe growable array
///
/// # Type Parameters
/// - `T`: Element type
/// - `A`: Allocator, `Global` by default
/// - `L`: Lock strategy, `RwLockStrategy` by default
///
/// # Example
///
/// ```rust
/// use concurrent_containers::ConcurrentVec;
///
/// let source = [1, 2, 3, 4, 5];
/// let vec = ConcurrentVec::from_iter_exact(source.iter().copied()).unwrap();
/// assert_eq!(vec.len(), 5);
/// assert_eq!(vec.capacity(), 5);
///
/// vec.push(6).unwrap();
/// assert_eq!(vec.back().unwrap(), 6);
/// ```
pub struct ConcurrentVec<T, A: Allocator<T> = Global, L: LockStrategy = RwLockStrategy> {
    raw: UnsafeCell<RawBuffer<T, A>>,
    len: AtomicUsize,
    cap: AtomicUsize,
    growth: GrowthPolicy,
    lock: L,
    _owns: PhantomData<T>,
}

// SAFETY: the vector owns its elements and allocator outright.
unsafe impl<T: Send, A: Allocator<T> + Send, L: LockStrategy + Send> Send for ConcurrentVec<T, A, L> {}

// SAFETY: buffer and allocator are only reached under `lock`. Shared holders
// hand out `&T` and `&A` on several threads; exclusive holders move values
// and use the allocator from any thread. A `!Sync` strategy keeps the vector
// on one thread.
unsafe impl<T: Send + Sync, A: Allocator<T> + Send + Sync, L: LockStrategy + Sync> Sync
    for ConcurrentVec<T, A, L>
{
}

impl<T, A: Allocator<T>, L: LockStrategy> ConcurrentVec<T, A, L> {
    /// Wrap a filled buffer whose first `len` slots are live
    pub(crate) fn from_raw(raw: RawBuffer<T, A>, len: usize, lock: L) -> Self {
        debug_assert!(len <= raw.capacity());
        let cap = raw.capacity();
        Self {
            raw: UnsafeCell::new(raw),
            len: AtomicUsize::new(len),
            cap: AtomicUsize::new(cap),
            growth: GrowthPolicy::for_element::<T>(),
            lock,
            _owns: PhantomData,
        }
    }

    /// # Safety
    ///
    /// Caller holds a shared or exclusive lock for the borrow's lifetime.
    #[inline]
    pub(crate) unsafe fn raw(&self) -> &RawBuffer<T, A> {
        &*self.raw.get()
    }

    /// # Safety
    ///
    /// Caller holds the exclusive lock, and no slice into the buffer is alive.
    #[inline]
    #[allow(clippy::mut_from_ref)]
    pub(crate) unsafe fn raw_mut(&self) -> &mut RawBuffer<T, A> {
        &mut *self.raw.get()
    }

    /// Publish new cursors; only called under the exclusive lock
    ///
    /// A growing capacity is stored before the length and a shrinking one
    /// after it, so every intermediate state keeps `len <= cap`.
    #[inline]
    pub(crate) fn set_cursors(&self, len: usize, cap: usize) {
        debug_assert!(len <= cap);
        let grows = cap > self.cap.load(Ordering::Relaxed);
        if grows {
            self.cap.store(cap, Ordering::Release);
        }
        self.len.store(len, Ordering::Release);
        if !grows {
            self.cap.store(cap, Ordering::Release);
        }
    }

    /// Number of live elements, read without locking
    #[inline]
    pub fn len(&self) -> usize {
        self.len.load(Ordering::Acquire)
    }

    /// Allocated slots, read without locking
    #[inline]
    pub fn capacity(&self) -> usize {
        self.cap.load(Ordering::Acquire)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Growth policy used by `push` and `reserve`
    pub fn growth_policy(&self) -> GrowthPolicy {
        self.growth
    }

    /// Replace the growth policy
    pub fn with_growth_policy(mut self, growth: GrowthPolicy) -> Self {
        self.growth = growth;
        self
    }

    /// Acquire a shared guard for batched reads
    pub fn new_scoped_read(&self) -> ScopedRead<'_, Self> {
        ScopedRead::new(self)
    }

    /// Acquire an exclusive guard for batched writes and structural changes
    pub fn new_scoped_write(&self) -> ScopedWrite<'_, Self> {
        ScopedWrite::new(self)
    }

    /// Copy of the element at `pos`, under a shared lock
    pub fn at(&self, pos: usize) -> ContainerResult<T>
    where
        T: Clone,
    {
        self.new_scoped_read().get(pos).cloned()
    }

    /// Copy of the element at `pos`, `None` when out of range
    pub fn get(&self, pos: usize) -> Option<T>
    where
        T: Clone,
    {
        self.new_scoped_read().get(pos).ok().cloned()
    }

    /// Copy of the first element; `OutOfRange` when empty
    pub fn front(&self) -> ContainerResult<T>
    where
        T: Clone,
    {
        self.new_scoped_read().front().cloned()
    }

    /// Copy of the last element; `OutOfRange` when empty
    pub fn back(&self) -> ContainerResult<T>
    where
        T: Clone,
    {
        self.new_scoped_read().back().cloned()
    }

    /// Consistent copy of every element
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.new_scoped_read().as_slice().to_vec()
    }

    /// Clone of the allocator in use
    pub fn allocator(&self) -> A {
        let _read = self.new_scoped_read();
        // SAFETY: shared lock held
        unsafe { self.raw().allocator().clone() }
    }

    /// Whether no buffer is allocated at all
    pub fn is_null(&self) -> bool {
        let _read = self.new_scoped_read();
        // SAFETY: shared lock held
        unsafe { self.raw().is_null() }
    }

    /// Direct access through a unique borrow; no locking needed
    pub fn get_mut(&mut self) -> &mut [T] {
        let len = *self.len.get_mut();
        let raw = self.raw.get_mut();
        // SAFETY: `&mut self` excludes every other access; `[0, len)` is live
        unsafe { slice::from_raw_parts_mut(raw.as_ptr(), len) }
    }
}

// SAFETY: the buffer is only reached through guards holding `lock`; it is
// relocated or released only through `&mut` guard methods or `&mut self`.
unsafe impl<T, A: Allocator<T>, L: LockStrategy> Guarded for ConcurrentVec<T, A, L> {
    type Item = T;
    type Lock = L;

    #[inline]
    fn lock_strategy(&self) -> &L {
        &self.lock
    }

    #[inline]
    unsafe fn elements(&self) -> &[T] {
        slice::from_raw_parts(self.raw().as_ptr(), self.len.load(Ordering::Relaxed))
    }

    #[inline]
    unsafe fn elements_mut(&self) -> &mut [T] {
        slice::from_raw_parts_mut(self.raw().as_ptr(), self.len.load(Ordering::Relaxed))
    }
}

impl<T, A: Allocator<T>, L: LockStrategy> Drop for ConcurrentVec<T, A, L> {
    fn drop(&mut self) {
        let len = *self.len.get_mut();
        let raw = self.raw.get_mut();
        if !raw.is_null() {
            trace!(len, capacity = raw.capacity(), "dropping vector");
        }
        // SAFETY: `[0, len)` is live and never touched again; the buffer
        // itself is released by `RawBuffer::drop`, only when non-null
        unsafe { raw.destroy_range(0, len) };
    }
}

impl<T, A: Allocator<T> + Default, L: LockStrategy + Default> Default for ConcurrentVec<T, A, L> {
    fn default() -> Self {
        Self::with_strategy_in(A::default(), L::default())
    }
}

impl<T: Clone, A: Allocator<T>, L: LockStrategy + Default> Clone for ConcurrentVec<T, A, L> {
    /// # Panics
    ///
    /// Panics if the allocator fails; use `try_clone` to handle that.
    fn clone(&self) -> Self {
        match self.try_clone() {
            Ok(copy) => copy,
            Err(err) => panic!("failed to clone ConcurrentVec: {err}"),
        }
    }
}

impl<T: PartialEq, A: Allocator<T>, L: LockStrategy> PartialEq for ConcurrentVec<T, A, L> {
    fn eq(&self, other: &Self) -> bool {
        match read_pair(self, other) {
            Some((mine, theirs)) => mine.as_slice() == theirs.as_slice(),
            None => {
                let read = self.new_scoped_read();
                read.as_slice() == read.as_slice()
            }
        }
    }
}

impl<T: fmt::Debug, A: Allocator<T>, L: LockStrategy> fmt::Debug for ConcurrentVec<T, A, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let read = self.new_scoped_read();
        f.debug_struct("ConcurrentVec")
            .field("len", &read.len())
            .field("capacity", &self.capacity())
            .field("elements", &read.as_slice())
            .finish()
    }
}

/// Unwrap a construction result the way std collections do: panic on
/// allocation failure
fn expect_alloc<V>(result: ContainerResult<V>) -> V {
    match result {
        Ok(value) => value,
        Err(err) => panic!("ConcurrentVec allocation failed: {err}"),
    }
}

impl<T, const N: usize> From<[T; N]> for ConcurrentVec<T> {
    fn from(values: [T; N]) -> Self {
        expect_alloc(Self::from_iter_exact(values))
    }
}

impl<T: Clone> From<&[T]> for ConcurrentVec<T> {
    fn from(values: &[T]) -> Self {
        expect_alloc(Self::from_iter_exact(values.iter().cloned()))
    }
}

impl<T> From<Vec<T>> for ConcurrentVec<T> {
    fn from(values: Vec<T>) -> Self {
        expect_alloc(Self::from_iter_exact(values))
    }
}

impl<T> FromIterator<T> for ConcurrentVec<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<T>>())
    }
}

impl<T, A: Allocator<T>, L: LockStrategy> ScopedWrite<'_, ConcurrentVec<T, A, L>> {
    /// Allocated slots
    pub fn capacity(&self) -> usize {
        self.container().capacity()
    }
}

impl<T, A: Allocator<T>, L: LockStrategy> ScopedRead<'_, ConcurrentVec<T, A, L>> {
    /// Allocated slots
    pub fn capacity(&self) -> usize {
        self.container().capacity()
    }
}
