/*!
 * Memory Module
 *
 * Allocator capability and owned buffers for `ConcurrentVec`.
 *
 * ## Construction Protocol
 *
 * Bulk construction is two-phase:
 * 1. `RawBuffer::allocate_in` reserves uninitialized slots
 * 2. `PartialFill` constructs elements one at a time and counts successes
 *
 * If element `k` fails (error or panic), dropping the `PartialFill`
 * destroys the `k` live elements in reverse order and releases the
 * allocation. The caller sees either a fully built buffer or nothing.
 */

mod global;
mod raw;
mod traits;
mod tracking;
mod types;

// Re-export for convenience
pub use global::Global;
pub(crate) use raw::{PartialFill, RawBuffer};
pub use traits::Allocator;
pub use tracking::TrackingAllocator;
pub use types::{AllocationSnapshot, AllocationStats};
