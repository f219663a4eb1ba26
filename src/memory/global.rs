/*!
 * Global Allocator
 * Typed adapter over the process-wide Rust allocator
 */

use super::traits::Allocator;
use crate::core::errors::{ContainerError, ContainerResult};
use std::alloc::{self, Layout};
use std::ptr::NonNull;

/// Allocator backed by `std::alloc`
///
/// Stateless, so all instances compare equal. Zero-sized requests never
/// reach the heap and return a dangling, well-aligned pointer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Global;

/// Layout for `n` values of `T`, or `CapacityOverflow`
#[inline]
pub(crate) fn array_layout<T>(n: usize) -> ContainerResult<Layout> {
    Layout::array::<T>(n).map_err(|_| ContainerError::CapacityOverflow { requested: n })
}

impl<T> Allocator<T> for Global {
    fn allocate(&self, n: usize) -> ContainerResult<NonNull<T>> {
        let layout = array_layout::<T>(n)?;
        if layout.size() == 0 {
            return Ok(NonNull::dangling());
        }

        // SAFETY: layout has non-zero size
        let ptr = unsafe { alloc::alloc(layout) } as *mut T;
        NonNull::new(ptr).ok_or(ContainerError::AllocationFailed {
            bytes: layout.size(),
            align: layout.align(),
        })
    }

    unsafe fn deallocate(&self, ptr: NonNull<T>, n: usize) {
        // Layout was valid when the block was allocated
        let Ok(layout) = Layout::array::<T>(n) else {
            return;
        };
        if layout.size() != 0 {
            alloc::dealloc(ptr.as_ptr() as *mut u8, layout);
        }
    }
}
