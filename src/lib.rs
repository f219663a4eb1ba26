/*!
 * Concurrent Containers Library
 * Thread-safe fixed-size and growable arrays built on pluggable lock strategies
 *
 * Every single-element accessor takes the container's lock for exactly one
 * call. Batched work goes through a scoped guard, which holds the lock until
 * it is dropped:
 *
 * ```rust
 * use concurrent_containers::ConcurrentArray;
 *
 * let array = ConcurrentArray::new([3, 1, 2]);
 * {
 *     let mut write = array.new_scoped_write();
 *     write.as_mut_slice().sort();
 * }
 * assert_eq!(array.at(0).unwrap(), 1);
 * ```
 */

pub mod containers;
pub mod core;
pub mod memory;

// Re-exports
pub use crate::containers::{ConcurrentArray, ConcurrentVec};
pub use crate::core::errors::{ContainerError, ContainerResult};
pub use crate::core::guard::{lock_pair, Guarded, ScopedRead, ScopedWrite};
pub use crate::core::sync::{
    GrowthPolicy, LockConfig, LockStrategy, MutexStrategy, NoopStrategy, RuntimeStrategy,
    RwLockStrategy, StrategyType,
};
pub use crate::memory::{AllocationSnapshot, AllocationStats, Allocator, Global, TrackingAllocator};
