/*!
 * Allocator Policy Tests
 *
 * Copy-construction allocator selection and failure during allocator moves
 */

use concurrent_containers::{Allocator, ConcurrentVec, ContainerError, ContainerResult, Global};
use pretty_assertions::assert_eq;
use std::ptr::NonNull;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Allocator that hands copies a different generation
#[derive(Debug, Clone, PartialEq)]
struct Generational {
    generation: u32,
}

impl<T> Allocator<T> for Generational {
    fn allocate(&self, n: usize) -> ContainerResult<NonNull<T>> {
        <Global as Allocator<T>>::allocate(&Global, n)
    }

    unsafe fn deallocate(&self, ptr: NonNull<T>, n: usize) {
        <Global as Allocator<T>>::deallocate(&Global, ptr, n);
    }

    fn select_on_copy(&self) -> Self {
        Generational {
            generation: self.generation + 1,
        }
    }
}

/// Allocator that refuses every request once `fail` is set
#[derive(Debug, Clone, Default)]
struct Switchable {
    fail: Arc<AtomicBool>,
}

impl PartialEq for Switchable {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.fail, &other.fail)
    }
}

impl<T> Allocator<T> for Switchable {
    fn allocate(&self, n: usize) -> ContainerResult<NonNull<T>> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(ContainerError::AllocationFailed {
                bytes: n * std::mem::size_of::<T>(),
                align: std::mem::align_of::<T>(),
            });
        }
        <Global as Allocator<T>>::allocate(&Global, n)
    }

    unsafe fn deallocate(&self, ptr: NonNull<T>, n: usize) {
        <Global as Allocator<T>>::deallocate(&Global, ptr, n);
    }
}

#[test]
fn test_copy_uses_selected_allocator() {
    let vec = ConcurrentVec::from_fn_in(3, Generational { generation: 0 }, |i| i * 2).unwrap();

    let copy = vec.try_clone().unwrap();
    assert_eq!(copy.allocator(), Generational { generation: 1 });
    assert_eq!(vec.allocator(), Generational { generation: 0 });
    assert_eq!(copy.to_vec(), vec![0, 2, 4]);

    let again = copy.clone();
    assert_eq!(again.allocator(), Generational { generation: 2 });
}

#[test]
fn test_explicit_copy_allocator_is_not_reselected() {
    let vec = ConcurrentVec::from_fn_in(2, Generational { generation: 0 }, |i| i).unwrap();
    let copy = vec.clone_in(Generational { generation: 7 }).unwrap();
    assert_eq!(copy.allocator(), Generational { generation: 7 });
}

#[test]
fn test_failed_allocator_move_leaves_source_untouched() {
    let source_alloc = Switchable::default();
    let vec = ConcurrentVec::from_fn_in(4, source_alloc.clone(), |i| format!("item{}", i)).unwrap();
    vec.reserve(6).unwrap();
    let (len, capacity) = (vec.len(), vec.capacity());
    let addr = vec.new_scoped_read().as_slice().as_ptr();

    let target_alloc = Switchable::default();
    target_alloc.fail.store(true, Ordering::SeqCst);

    let err = vec.take_in(target_alloc).unwrap_err();
    assert!(matches!(err, ContainerError::AllocationFailed { .. }));

    assert_eq!((vec.len(), vec.capacity()), (len, capacity));
    assert_eq!(vec.to_vec(), vec!["item0", "item1", "item2", "item3"]);
    assert_eq!(vec.new_scoped_read().as_slice().as_ptr(), addr);
    assert!(vec.allocator() == source_alloc);

    // Still fully usable afterwards
    vec.push(String::from("item4")).unwrap();
    assert_eq!(vec.len(), 5);
}
