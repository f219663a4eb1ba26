/*!
 * Lock Strategy Trait
 * Exclusive/shared acquisition over one logical resource
 */

use parking_lot::{Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::cell::Cell;

/// Capability to acquire exclusive and shared access to one resource
///
/// Each acquisition returns a handle; dropping the handle releases the lock.
/// Acquisition blocks until granted and never fails.
///
/// # Contract
///
/// - While an `Exclusive` handle is alive no other handle of either kind is.
/// - Any number of `Shared` handles may be alive together, but never
///   alongside an `Exclusive` one.
///
/// Containers rely on this contract for memory safety. A strategy may
/// enforce it by blocking, or (like `NoopStrategy`) by panicking on an
/// overlapping acquisition while staying `!Sync`.
pub trait LockStrategy {
    /// Handle held while exclusive access is granted
    type Exclusive<'a>
    where
        Self: 'a;

    /// Handle held while shared access is granted
    type Shared<'a>
    where
        Self: 'a;

    /// Block until no other holder is active, then grant exclusive access
    fn acquire_exclusive(&self) -> Self::Exclusive<'_>;

    /// Block until no exclusive holder is active, then grant shared access
    fn acquire_shared(&self) -> Self::Shared<'_>;
}

/// Default strategy: one readers-writer lock per container
#[derive(Debug, Default)]
pub struct RwLockStrategy {
    lock: RwLock<()>,
}

impl LockStrategy for RwLockStrategy {
    type Exclusive<'a> = RwLockWriteGuard<'a, ()>;
    type Shared<'a> = RwLockReadGuard<'a, ()>;

    #[inline]
    fn acquire_exclusive(&self) -> Self::Exclusive<'_> {
        self.lock.write()
    }

    #[inline]
    fn acquire_shared(&self) -> Self::Shared<'_> {
        self.lock.read()
    }
}

/// Mutex-backed strategy
///
/// Shared acquisition is exclusive too, so readers serialize. Cheaper than a
/// readers-writer lock when almost every access writes.
#[derive(Debug, Default)]
pub struct MutexStrategy {
    lock: Mutex<()>,
}

impl LockStrategy for MutexStrategy {
    type Exclusive<'a> = MutexGuard<'a, ()>;
    type Shared<'a> = MutexGuard<'a, ()>;

    #[inline]
    fn acquire_exclusive(&self) -> Self::Exclusive<'_> {
        self.lock.lock()
    }

    #[inline]
    fn acquire_shared(&self) -> Self::Shared<'_> {
        self.lock.lock()
    }
}

/// Strategy that performs no synchronization
///
/// For containers confined to one thread. It is `!Sync`, and instead of
/// blocking it tracks holders in a plain `Cell`: an acquisition that would
/// overlap an incompatible holder panics, so two guards can never alias.
#[derive(Debug, Default)]
pub struct NoopStrategy {
    // > 0: shared holders, -1: exclusive holder
    state: Cell<isize>,
}

/// Exclusive handle of a `NoopStrategy`
#[derive(Debug)]
pub struct NoopExclusive<'a> {
    state: &'a Cell<isize>,
}

impl Drop for NoopExclusive<'_> {
    fn drop(&mut self) {
        self.state.set(0);
    }
}

/// Shared handle of a `NoopStrategy`
#[derive(Debug)]
pub struct NoopShared<'a> {
    state: &'a Cell<isize>,
}

impl Drop for NoopShared<'_> {
    fn drop(&mut self) {
        self.state.set(self.state.get() - 1);
    }
}

impl LockStrategy for NoopStrategy {
    type Exclusive<'a> = NoopExclusive<'a>;
    type Shared<'a> = NoopShared<'a>;

    #[inline]
    fn acquire_exclusive(&self) -> Self::Exclusive<'_> {
        assert!(
            self.state.get() == 0,
            "NoopStrategy: exclusive access while another guard is alive"
        );
        self.state.set(-1);
        NoopExclusive { state: &self.state }
    }

    #[inline]
    fn acquire_shared(&self) -> Self::Shared<'_> {
        let holders = self.state.get();
        assert!(
            holders >= 0,
            "NoopStrategy: shared access while an exclusive guard is alive"
        );
        self.state.set(holders + 1);
        NoopShared { state: &self.state }
    }
}
