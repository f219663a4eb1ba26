/*!
 * Memory Types
 * Allocation counters shared by tracking allocators
 */

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Live allocation counters
///
/// Updated with relaxed atomics; read a consistent view with `snapshot`
/// once the observed containers are quiescent.
#[derive(Debug, Default)]
pub struct AllocationStats {
    allocations: AtomicUsize,
    deallocations: AtomicUsize,
    constructed: AtomicUsize,
    destroyed: AtomicUsize,
    current_bytes: AtomicUsize,
    peak_bytes: AtomicUsize,
}

impl AllocationStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_allocation(&self, bytes: usize) {
        self.allocations.fetch_add(1, Ordering::Relaxed);
        let current = self.current_bytes.fetch_add(bytes, Ordering::Relaxed) + bytes;
        self.peak_bytes.fetch_max(current, Ordering::Relaxed);
    }

    pub(crate) fn record_deallocation(&self, bytes: usize) {
        self.deallocations.fetch_add(1, Ordering::Relaxed);
        self.current_bytes.fetch_sub(bytes, Ordering::Relaxed);
    }

    pub(crate) fn record_construct(&self) {
        self.constructed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_destroy(&self) {
        self.destroyed.fetch_add(1, Ordering::Relaxed);
    }

    /// Copy the counters out
    pub fn snapshot(&self) -> AllocationSnapshot {
        AllocationSnapshot {
            allocations: self.allocations.load(Ordering::Relaxed),
            deallocations: self.deallocations.load(Ordering::Relaxed),
            constructed: self.constructed.load(Ordering::Relaxed),
            destroyed: self.destroyed.load(Ordering::Relaxed),
            current_bytes: self.current_bytes.load(Ordering::Relaxed),
            peak_bytes: self.peak_bytes.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of `AllocationStats`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationSnapshot {
    pub allocations: usize,
    pub deallocations: usize,
    pub constructed: usize,
    pub destroyed: usize,
    pub current_bytes: usize,
    pub peak_bytes: usize,
}

impl AllocationSnapshot {
    /// Elements constructed and not yet destroyed
    pub fn live_elements(&self) -> usize {
        self.constructed.saturating_sub(self.destroyed)
    }

    /// Allocations not yet released
    pub fn outstanding_allocations(&self) -> usize {
        self.allocations.saturating_sub(self.deallocations)
    }

    /// No memory held and no element alive
    pub fn is_balanced(&self) -> bool {
        self.live_elements() == 0 && self.outstanding_allocations() == 0 && self.current_bytes == 0
    }
}
