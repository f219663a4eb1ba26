/*!
 * Tracking Allocator
 * Counts allocations and element lifecycles on top of `Global`
 */

use super::global::{array_layout, Global};
use super::traits::Allocator;
use super::types::{AllocationSnapshot, AllocationStats};
use crate::core::errors::ContainerResult;
use std::fmt;
use std::ptr::NonNull;
use std::sync::Arc;

/// Allocator that records every allocate/deallocate/construct/destroy
///
/// Clones share one `AllocationStats`, so a test can keep a handle while a
/// container owns another. Two tracking allocators are equal only when they
/// share stats.
#[derive(Clone, Default)]
pub struct TrackingAllocator {
    stats: Arc<AllocationStats>,
}

impl TrackingAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared counters
    pub fn stats(&self) -> &Arc<AllocationStats> {
        &self.stats
    }

    /// Copy of the current counters
    pub fn snapshot(&self) -> AllocationSnapshot {
        self.stats.snapshot()
    }
}

impl PartialEq for TrackingAllocator {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.stats, &other.stats)
    }
}

impl Eq for TrackingAllocator {}

impl fmt::Debug for TrackingAllocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackingAllocator")
            .field("stats", &self.stats.snapshot())
            .finish()
    }
}

impl<T> Allocator<T> for TrackingAllocator {
    fn allocate(&self, n: usize) -> ContainerResult<NonNull<T>> {
        let ptr = <Global as Allocator<T>>::allocate(&Global, n)?;
        self.stats.record_allocation(array_layout::<T>(n)?.size());
        Ok(ptr)
    }

    unsafe fn deallocate(&self, ptr: NonNull<T>, n: usize) {
        <Global as Allocator<T>>::deallocate(&Global, ptr, n);
        let bytes = array_layout::<T>(n).map(|l| l.size()).unwrap_or(0);
        self.stats.record_deallocation(bytes);
    }

    unsafe fn construct(&self, slot: NonNull<T>, value: T) {
        <Global as Allocator<T>>::construct(&Global, slot, value);
        self.stats.record_construct();
    }

    unsafe fn destroy(&self, slot: NonNull<T>) {
        <Global as Allocator<T>>::destroy(&Global, slot);
        self.stats.record_destroy();
    }
}
