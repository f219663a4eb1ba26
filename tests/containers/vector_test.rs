/*!
 * Dynamic Array Tests
 */

use concurrent_containers::{ConcurrentVec, ContainerError, Global, TrackingAllocator};
use pretty_assertions::assert_eq;

#[test]
fn test_iterator_range_construction() {
    let source = [1, 2, 3, 4, 5];
    let vec = ConcurrentVec::from_iter_exact(source.iter().copied()).unwrap();

    assert_eq!(vec.len(), 5);
    assert_eq!(vec.capacity(), 5);
    assert_eq!(vec.to_vec(), source.to_vec());
}

#[test]
fn test_construction_variants() {
    let empty: ConcurrentVec<i32> = ConcurrentVec::default();
    assert_eq!((empty.len(), empty.capacity()), (0, 0));
    assert!(empty.is_null());

    let filled = ConcurrentVec::from_elem(3, 'z').unwrap();
    assert_eq!(filled.to_vec(), vec!['z'; 3]);

    let defaults: ConcurrentVec<u16> = ConcurrentVec::with_len(4).unwrap();
    assert_eq!(defaults.to_vec(), vec![0; 4]);
    assert_eq!(defaults.capacity(), 4);

    let squares = ConcurrentVec::from_fn(4, |i| i * i).unwrap();
    assert_eq!(squares.to_vec(), vec![0, 1, 4, 9]);

    let listed = ConcurrentVec::from([10, 20]);
    assert_eq!(listed.at(1).unwrap(), 20);

    let collected: ConcurrentVec<u8> = (1..=3).collect();
    assert_eq!(collected.to_vec(), vec![1, 2, 3]);

    let sliced = ConcurrentVec::from(&["a", "b"][..]);
    assert_eq!(sliced.back().unwrap(), "b");
}

#[test]
fn test_access_bounds() {
    let vec = ConcurrentVec::from(vec![1, 2]);
    assert_eq!(vec.at(2), Err(ContainerError::OutOfRange { pos: 2, len: 2 }));
    assert_eq!(vec.set(2, 0), Err(ContainerError::OutOfRange { pos: 2, len: 2 }));
    assert_eq!(vec.get(1), Some(2));
    assert_eq!(vec.get(2), None);

    let empty: ConcurrentVec<u8> = ConcurrentVec::new();
    assert_eq!(empty.front(), Err(ContainerError::OutOfRange { pos: 0, len: 0 }));
    assert!(empty.back().is_err());
}

#[test]
fn test_copy_of_empty_has_no_capacity() {
    let alloc = TrackingAllocator::new();
    let empty: ConcurrentVec<String, _> = ConcurrentVec::new_in(alloc.clone());
    empty.reserve(16).unwrap();
    assert_eq!(empty.capacity(), 16);

    let copy = empty.try_clone().unwrap();
    assert!(copy.is_empty());
    assert_eq!(copy.capacity(), 0);
    assert!(copy.is_null());
}

#[test]
fn test_copy_sizes_to_live_range() {
    let vec = ConcurrentVec::from(vec![1, 2, 3]);
    vec.reserve(100).unwrap();

    let copy = vec.clone();
    assert_eq!(copy.capacity(), 3);
    assert_eq!(copy, vec);
    copy.set(0, 0).unwrap();
    assert_eq!(vec.at(0).unwrap(), 1);
}

#[test]
fn test_move_keeps_element_addresses() {
    let vec = ConcurrentVec::from(vec![String::from("a"), String::from("b")]);
    let before: Vec<*const String> = vec.new_scoped_read().iter().map(|s| s as *const _).collect();

    let moved = vec.take();

    assert_eq!(vec.len(), 0);
    assert_eq!(vec.capacity(), 0);
    assert!(vec.is_null());

    let after: Vec<*const String> = moved.new_scoped_read().iter().map(|s| s as *const _).collect();
    assert_eq!(before, after);
    assert_eq!(moved.to_vec(), vec!["a", "b"]);

    // Moved-from vector stays usable
    vec.push(String::from("c")).unwrap();
    assert_eq!(vec.to_vec(), vec!["c"]);
}

#[test]
fn test_move_with_equal_allocator() {
    let alloc = TrackingAllocator::new();
    let vec = ConcurrentVec::from_fn_in(3, alloc.clone(), |i| i as u32).unwrap();
    let addr = vec.new_scoped_read().as_slice().as_ptr();

    let moved = vec.take_in(alloc.clone()).unwrap();
    assert_eq!(moved.new_scoped_read().as_slice().as_ptr(), addr);
    assert!(vec.is_null());
    assert_eq!(alloc.snapshot().allocations, 1);
}

#[test]
fn test_move_with_unequal_allocator() {
    let source_alloc = TrackingAllocator::new();
    let target_alloc = TrackingAllocator::new();
    let vec = ConcurrentVec::from_fn_in(3, source_alloc.clone(), |i| i.to_string()).unwrap();
    vec.reserve(5).unwrap();
    let capacity = vec.capacity();

    let moved = vec.take_in(target_alloc.clone()).unwrap();

    assert_eq!(moved.to_vec(), vec!["0", "1", "2"]);
    assert_eq!(moved.capacity(), capacity);
    assert!(moved.allocator() == target_alloc);

    // Source keeps its storage but owns no elements
    assert_eq!(vec.len(), 0);
    assert_eq!(vec.capacity(), capacity);
    assert!(!vec.is_null());

    let target = target_alloc.snapshot();
    assert_eq!(target.allocations, 1);
    assert_eq!(target.constructed, 3);

    drop(moved);
    drop(vec);
    assert!(target_alloc.snapshot().is_balanced());
    assert_eq!(source_alloc.snapshot().outstanding_allocations(), 0);
}

#[test]
fn test_global_allocator_is_default() {
    let vec: ConcurrentVec<u8> = ConcurrentVec::new();
    assert_eq!(vec.allocator(), Global);
}

#[test]
fn test_structural_mutation_sequence() {
    let vec: ConcurrentVec<i32> = ConcurrentVec::new();
    for i in 0..10 {
        vec.push(i).unwrap();
    }
    vec.truncate(6);
    assert_eq!(vec.pop(), Some(5));
    vec.fill(-1);
    assert_eq!(vec.to_vec(), vec![-1; 5]);

    vec.shrink_to_fit().unwrap();
    assert_eq!(vec.capacity(), 5);

    let other = ConcurrentVec::from(vec![7]);
    vec.assign_from(&other).unwrap();
    assert_eq!(vec.to_vec(), vec![7]);
    assert_eq!(format!("{:?}", vec), "ConcurrentVec { len: 1, capacity: 1, elements: [7] }");
}
