/*!
 * Construction Rollback Tests
 *
 * A failure while constructing element k must leave exactly k
 * constructions undone and the one allocation released.
 */

use concurrent_containers::{ConcurrentVec, ContainerError, TrackingAllocator};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::panic::{self, AssertUnwindSafe};

#[derive(Debug, PartialEq)]
enum BuildError {
    Element(usize),
    Container(ContainerError),
}

impl From<ContainerError> for BuildError {
    fn from(err: ContainerError) -> Self {
        BuildError::Container(err)
    }
}

fn build_failing_at(count: usize, k: usize, alloc: &TrackingAllocator) -> Result<(), BuildError> {
    ConcurrentVec::try_from_fn_in(count, alloc.clone(), |i| {
        if i == k {
            Err(BuildError::Element(i))
        } else {
            Ok(vec![i; 3])
        }
    })
    .map(drop)
}

#[test]
fn test_error_rolls_back_constructed_elements() {
    let alloc = TrackingAllocator::new();
    let result = build_failing_at(8, 5, &alloc);
    assert_eq!(result, Err(BuildError::Element(5)));

    let snap = alloc.snapshot();
    assert_eq!(snap.constructed, 5);
    assert_eq!(snap.destroyed, 5);
    assert_eq!(snap.allocations, 1);
    assert_eq!(snap.deallocations, 1);
    assert!(snap.is_balanced());
}

#[test]
fn test_failure_on_first_element() {
    let alloc = TrackingAllocator::new();
    assert_eq!(build_failing_at(4, 0, &alloc), Err(BuildError::Element(0)));

    let snap = alloc.snapshot();
    assert_eq!(snap.constructed, 0);
    assert_eq!(snap.allocations, 1);
    assert_eq!(snap.deallocations, 1);
}

#[test]
fn test_random_failure_index() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..50 {
        let count = rng.gen_range(1..64);
        let k = rng.gen_range(0..count);

        let alloc = TrackingAllocator::new();
        assert_eq!(build_failing_at(count, k, &alloc), Err(BuildError::Element(k)));

        let snap = alloc.snapshot();
        assert_eq!(snap.constructed, k);
        assert_eq!(snap.destroyed, k);
        assert_eq!((snap.allocations, snap.deallocations), (1, 1));
    }
}

#[test]
fn test_allocation_error_converts() {
    let result: Result<ConcurrentVec<u64>, BuildError> =
        ConcurrentVec::try_from_fn(usize::MAX, |_| Ok(0));
    assert_eq!(
        result.unwrap_err(),
        BuildError::Container(ContainerError::CapacityOverflow { requested: usize::MAX })
    );
}

#[derive(Debug)]
struct Fragile(u32);

impl Clone for Fragile {
    fn clone(&self) -> Self {
        if self.0 == 3 {
            panic!("refusing to clone 3");
        }
        Fragile(self.0)
    }
}

#[test]
fn test_panicking_clone_rolls_back_copy() {
    let source_alloc = TrackingAllocator::new();
    let source = ConcurrentVec::from_fn_in(6, source_alloc.clone(), |i| Fragile(i as u32)).unwrap();

    let copy_alloc = TrackingAllocator::new();
    let result = panic::catch_unwind(AssertUnwindSafe(|| source.clone_in(copy_alloc.clone())));
    assert!(result.is_err());

    let snap = copy_alloc.snapshot();
    assert_eq!(snap.constructed, 3);
    assert_eq!(snap.destroyed, 3);
    assert!(snap.is_balanced());

    // Source lock was released during unwinding
    source.push(Fragile(10)).unwrap();
    assert_eq!(source.len(), 7);
}

#[test]
fn test_panicking_closure_rolls_back() {
    let alloc = TrackingAllocator::new();
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        ConcurrentVec::from_fn_in(10, alloc.clone(), |i| {
            assert!(i < 7, "element {} failed", i);
            String::from("ok")
        })
    }));
    assert!(result.is_err());

    let snap = alloc.snapshot();
    assert_eq!(snap.constructed, 7);
    assert_eq!(snap.destroyed, 7);
    assert_eq!(snap.allocations, 1);
    assert_eq!(snap.deallocations, 1);
}

#[test]
fn test_drop_destroys_everything() {
    let alloc = TrackingAllocator::new();
    {
        let vec = ConcurrentVec::from_elem_in(12, String::from("x"), alloc.clone()).unwrap();
        vec.push(String::from("y")).unwrap();
        vec.truncate(4);
    }
    assert!(alloc.snapshot().is_balanced());
}

thread_local! {
    static BUILT: std::cell::Cell<usize> = std::cell::Cell::new(0);
    static FAIL_AT: std::cell::Cell<usize> = std::cell::Cell::new(usize::MAX);
}

/// Counts constructions on the current thread and panics at `FAIL_AT`
fn next_construction() {
    let n = BUILT.with(|built| {
        let n = built.get();
        built.set(n + 1);
        n
    });
    if n == FAIL_AT.with(|fail_at| fail_at.get()) {
        panic!("construction {} failed", n);
    }
}

fn fail_at(k: usize) {
    BUILT.with(|built| built.set(0));
    FAIL_AT.with(|fail_at| fail_at.set(k));
}

#[derive(Debug)]
struct Counted(String);

impl Default for Counted {
    fn default() -> Self {
        next_construction();
        Counted(String::from("default"))
    }
}

impl Clone for Counted {
    fn clone(&self) -> Self {
        next_construction();
        Counted(self.0.clone())
    }
}

#[test]
fn test_panicking_default_rolls_back_count_construction() {
    let alloc = TrackingAllocator::new();
    fail_at(4);
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        ConcurrentVec::<Counted, _>::with_len_in(9, alloc.clone())
    }));
    fail_at(usize::MAX);
    assert!(result.is_err());

    let snap = alloc.snapshot();
    assert_eq!(snap.constructed, 4);
    assert_eq!(snap.destroyed, 4);
    assert_eq!(snap.allocations, 1);
    assert_eq!(snap.deallocations, 1);
}

#[test]
fn test_panicking_clone_rolls_back_fill_construction() {
    let alloc = TrackingAllocator::new();
    let value = Counted(String::from("v"));
    fail_at(6);
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        ConcurrentVec::from_elem_in(10, value, alloc.clone())
    }));
    fail_at(usize::MAX);
    assert!(result.is_err());

    let snap = alloc.snapshot();
    assert_eq!(snap.constructed, 6);
    assert_eq!(snap.destroyed, 6);
    assert_eq!(snap.allocations, 1);
    assert_eq!(snap.deallocations, 1);
}

#[test]
fn test_count_constructors_succeed_without_failure() {
    let alloc = TrackingAllocator::new();
    fail_at(usize::MAX);
    {
        let defaults = ConcurrentVec::<Counted, _>::with_len_in(3, alloc.clone()).unwrap();
        let copies = ConcurrentVec::from_elem_in(2, Counted(String::from("c")), alloc.clone()).unwrap();
        assert_eq!(defaults.len(), 3);
        assert_eq!(copies.at(1).unwrap().0, "c");
    }
    assert!(alloc.snapshot().is_balanced());
}
