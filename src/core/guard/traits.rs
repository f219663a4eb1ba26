/*!
 * Guard Traits
 *
 * What a container exposes so scoped guards can lock it and reach its elements
 */

use crate::core::sync::LockStrategy;

/// Container whose elements are protected by a `LockStrategy`
///
/// # Safety
///
/// Implementors promise that every access to the storage returned by
/// `elements`/`elements_mut` is coordinated through `lock_strategy()`, and
/// that the storage does not move or shrink while any lock handle from that
/// strategy is alive.
pub unsafe trait Guarded {
    /// Element type
    type Item;

    /// Strategy protecting the elements
    type Lock: LockStrategy;

    /// The container's own lock strategy instance
    fn lock_strategy(&self) -> &Self::Lock;

    /// Live elements
    ///
    /// # Safety
    ///
    /// The caller holds a shared or exclusive handle from `lock_strategy()`
    /// for the whole lifetime of the returned slice.
    unsafe fn elements(&self) -> &[Self::Item];

    /// Live elements, mutably
    ///
    /// # Safety
    ///
    /// The caller holds an exclusive handle from `lock_strategy()` for the
    /// whole lifetime of the returned slice, and no other reference into the
    /// elements is alive.
    #[allow(clippy::mut_from_ref)]
    unsafe fn elements_mut(&self) -> &mut [Self::Item];
}
