/*!
 * Core Module
 * Error types, lock strategies and scoped guards shared by every container
 */

pub mod errors;
pub mod guard;
pub mod sync;

// Re-export for convenience
pub use errors::*;
pub use guard::{lock_pair, Guarded, ScopedRead, ScopedWrite};
pub use sync::{LockConfig, LockStrategy, RwLockStrategy, StrategyType};
