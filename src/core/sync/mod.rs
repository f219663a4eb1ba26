/*!
 * Synchronization Strategies
 *
 * Pluggable locking for the containers:
 * - Readers-writer lock (default) for shared reads and exclusive writes
 * - Plain mutex where writes dominate
 * - Unsynchronized strategy for single-threaded use
 * - Runtime-selected strategy driven by `LockConfig`
 *
 * # Architecture
 *
 * Containers only see the two-operation `LockStrategy` capability. Static
 * strategies are injected as a generic parameter and monomorphize away;
 * `RuntimeStrategy` stores the choice as a value for callers that decide at
 * runtime.
 *
 * # Limitations
 *
 * No strategy is reentrant. Acquiring a second guard on the same container
 * from a thread that already holds one deadlocks under `RwLockStrategy` and
 * `MutexStrategy`, and panics under `NoopStrategy` unless both are shared.
 * Fairness between readers and writers is whatever `parking_lot` provides.
 */

mod config;
mod runtime;
mod strategy;

pub use config::{GrowthPolicy, LockConfig, StrategyType};
pub use runtime::{RuntimeExclusive, RuntimeShared, RuntimeStrategy};
pub use strategy::{
    LockStrategy, MutexStrategy, NoopExclusive, NoopShared, NoopStrategy, RwLockStrategy,
};
