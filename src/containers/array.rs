/*!
 * Concurrent Fixed Array
 * Thread-safe array of compile-time length with internal locking
 */

use crate::core::errors::{ContainerError, ContainerResult};
use crate::core::guard::{lock_pair, read_pair, Guarded, ScopedRead, ScopedWrite};
use crate::core::sync::{LockStrategy, RwLockStrategy};
use std::cell::UnsafeCell;
use std::fmt;

/// Thread-safe fixed-size array
///
/// Every element is always constructed and the length is always `N`
/// (`N >= 1`, checked at compile time). Single-element calls lock for the
/// duration of the call and return copies, never references that outlive
/// the lock. Batched work uses `new_scoped_read` / `new_scoped_write`.
///
/// # Type Parameters
/// - `T`: Element type
/// - `N`: Length (compile-time constant, non-zero)
/// - `L`: Lock strategy, `RwLockStrategy` by default
///
/// # Example
///
/// ```rust
/// use concurrent_containers::ConcurrentArray;
///
/// let array = ConcurrentArray::new([1, 2, 3]);
/// assert_eq!(array.at(0).unwrap(), 1);
/// assert_eq!(array.at(2).unwrap(), 3);
///
/// array.set(1, 9).unwrap();
/// assert_eq!(array.at(1).unwrap(), 9);
/// assert!(array.at(3).is_err());
/// ```
pub struct ConcurrentArray<T, const N: usize, L: LockStrategy = RwLockStrategy> {
    buffer: UnsafeCell<[T; N]>,
    lock: L,
}

// SAFETY: the buffer is only reached through `lock`. Shared holders hand out
// `&T` on several threads (needs `T: Sync`); exclusive holders may move
// values across threads (needs `T: Send`). A `!Sync` strategy keeps the
// whole array on one thread.
unsafe impl<T: Send + Sync, const N: usize, L: LockStrategy + Sync> Sync
    for ConcurrentArray<T, N, L>
{
}

impl<T, const N: usize> ConcurrentArray<T, N> {
    /// Create an array with the default lock strategy
    pub fn new(values: [T; N]) -> Self {
        Self::with_strategy(values, RwLockStrategy::default())
    }

    /// Create from up to `N` leading values; missing trailing elements are
    /// `T::default()` and values beyond `N` are ignored
    pub fn from_partial<I>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Default,
    {
        let mut values = values.into_iter();
        Self::new(std::array::from_fn(|_| values.next().unwrap_or_default()))
    }
}

impl<T, const N: usize, L: LockStrategy> ConcurrentArray<T, N, L> {
    const NON_EMPTY: () = assert!(N > 0, "ConcurrentArray does not support empty arrays");

    /// Create an array protected by the given strategy instance
    pub fn with_strategy(values: [T; N], lock: L) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::NON_EMPTY;
        Self {
            buffer: UnsafeCell::new(values),
            lock,
        }
    }

    /// Always `N`
    #[inline]
    pub const fn len(&self) -> usize {
        N
    }

    /// Always `false`; empty arrays do not exist
    #[inline]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Always `N`
    #[inline]
    pub const fn max_size(&self) -> usize {
        N
    }

    /// Acquire a shared guard for batched reads
    pub fn new_scoped_read(&self) -> ScopedRead<'_, Self> {
        ScopedRead::new(self)
    }

    /// Acquire an exclusive guard for batched writes
    pub fn new_scoped_write(&self) -> ScopedWrite<'_, Self> {
        ScopedWrite::new(self)
    }

    /// Copy of the element at `pos`, under a shared lock
    pub fn at(&self, pos: usize) -> ContainerResult<T>
    where
        T: Clone,
    {
        ContainerError::check_index(pos, N)?;
        let read = self.new_scoped_read();
        Ok(read.as_slice()[pos].clone())
    }

    /// Overwrite the element at `pos`, under an exclusive lock
    ///
    /// Out-of-range positions are rejected before the lock is taken and
    /// leave the buffer untouched.
    pub fn set(&self, pos: usize, value: T) -> ContainerResult<()> {
        ContainerError::check_index(pos, N)?;
        let mut write = self.new_scoped_write();
        write.as_mut_slice()[pos] = value;
        Ok(())
    }

    /// Overwrite all `N` elements in one critical section
    ///
    /// Concurrent fills never interleave: afterwards every element equals
    /// exactly one of the attempted values.
    pub fn fill(&self, value: T)
    where
        T: Clone,
    {
        self.new_scoped_write().fill(value);
    }

    /// Exchange contents with `other`, locking both
    ///
    /// Locks are taken in address order regardless of which side calls, so
    /// `a.swap(&b)` racing `b.swap(&a)` cannot deadlock. Swapping an array
    /// with itself does nothing.
    pub fn swap(&self, other: &Self) {
        if let Some((mut mine, mut theirs)) = lock_pair(self, other) {
            mine.as_mut_slice().swap_with_slice(theirs.as_mut_slice());
        }
    }

    /// Copy of the first element, under a shared lock
    pub fn front(&self) -> T
    where
        T: Clone,
    {
        self.new_scoped_read().as_slice()[0].clone()
    }

    /// Copy of the last element, under a shared lock
    pub fn back(&self) -> T
    where
        T: Clone,
    {
        self.new_scoped_read().as_slice()[N - 1].clone()
    }

    /// Consistent copy of every element
    pub fn to_array(&self) -> [T; N]
    where
        T: Clone,
    {
        let read = self.new_scoped_read();
        let elements = read.as_slice();
        std::array::from_fn(|i| elements[i].clone())
    }

    /// Direct access through a unique borrow; no locking needed
    pub fn get_mut(&mut self) -> &mut [T; N] {
        self.buffer.get_mut()
    }

    /// Unwrap into the plain array
    pub fn into_inner(self) -> [T; N] {
        self.buffer.into_inner()
    }
}

// SAFETY: `buffer` is only reached through guards that hold `lock`, and it
// never moves while `&self` is borrowed.
unsafe impl<T, const N: usize, L: LockStrategy> Guarded for ConcurrentArray<T, N, L> {
    type Item = T;
    type Lock = L;

    #[inline]
    fn lock_strategy(&self) -> &L {
        &self.lock
    }

    #[inline]
    unsafe fn elements(&self) -> &[T] {
        &*self.buffer.get()
    }

    #[inline]
    unsafe fn elements_mut(&self) -> &mut [T] {
        &mut *self.buffer.get()
    }
}

impl<T: Default, const N: usize, L: LockStrategy + Default> Default for ConcurrentArray<T, N, L> {
    fn default() -> Self {
        Self::with_strategy(std::array::from_fn(|_| T::default()), L::default())
    }
}

impl<T, const N: usize> From<[T; N]> for ConcurrentArray<T, N> {
    fn from(values: [T; N]) -> Self {
        Self::new(values)
    }
}

impl<T: Clone, const N: usize, L: LockStrategy + Default> Clone for ConcurrentArray<T, N, L> {
    fn clone(&self) -> Self {
        Self::with_strategy(self.to_array(), L::default())
    }
}

impl<T: PartialEq, const N: usize, L: LockStrategy> PartialEq for ConcurrentArray<T, N, L> {
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

impl<T: fmt::Debug, const N: usize, L: LockStrategy> fmt::Debug for ConcurrentArray<T, N, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let read = self.new_scoped_read();
        f.debug_struct("ConcurrentArray")
            .field("len", &N)
            .field("elements", &read.as_slice())
            .finish()
    }
}
