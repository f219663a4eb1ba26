/*!
 * Containers
 *
 * - `ConcurrentArray`: fixed length `N`, storage inline
 * - `ConcurrentVec`: growable, heap storage from a pluggable allocator
 *
 * Both lock internally for single-element calls and hand out scoped guards
 * for batches. Two-container operations (`swap`, equality) lock in address
 * order so opposite-direction calls cannot deadlock.
 */

mod array;
mod vector;

pub use array::ConcurrentArray;
pub use vector::ConcurrentVec;
