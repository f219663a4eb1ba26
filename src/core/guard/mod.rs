/*!
 * Scoped Guards
 *
 * RAII lock holders that batch element access under one acquisition.
 *
 * ## Design Principles
 *
 * 1. **Acquire on creation**: the lock is taken when the guard is built
 * 2. **Release on drop**: exactly once, on every exit path including unwinding
 * 3. **Move-only**: no `Clone`, so one lock hold has one release obligation
 * 4. **Borrow-scoped access**: slices and iterators borrow the guard, so
 *    they cannot outlive the lock
 *
 * ## Example
 *
 * ```rust
 * use concurrent_containers::ConcurrentArray;
 *
 * let array = ConcurrentArray::new([5, 4, 3, 2, 1]);
 * {
 *     let mut write = array.new_scoped_write();
 *     write.as_mut_slice().sort();
 *     *write.get_mut(0).unwrap() = 10;
 * } // lock released here
 *
 * let read = array.new_scoped_read();
 * assert_eq!(read.iter().rev().copied().collect::<Vec<_>>(), vec![5, 4, 3, 2, 10]);
 * ```
 *
 * ## Limitations
 *
 * Guards are not reentrant. Creating a second guard on a container while
 * the same thread still holds one deadlocks under the blocking strategies.
 */

mod scoped;
mod traits;

pub use scoped::{lock_pair, ScopedRead, ScopedWrite};
pub(crate) use scoped::read_pair;
pub use traits::Guarded;
