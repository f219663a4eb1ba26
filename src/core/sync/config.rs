/*!
 * Synchronization Configuration
 *
 * Runtime configuration for strategy selection and buffer growth
 */

use serde::{Deserialize, Serialize};

/// Strategy type selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrategyType {
    /// Readers-writer lock (shared reads, exclusive writes)
    ReadWrite,
    /// Mutex (every access exclusive)
    Mutex,
    /// Auto-select for the common read-mostly case
    Auto,
}

/// Lock configuration for `RuntimeStrategy`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockConfig {
    /// Preferred strategy
    pub strategy: StrategyType,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyType::Auto,
        }
    }
}

impl LockConfig {
    /// Configuration for containers that are mostly read
    pub const fn read_mostly() -> Self {
        Self {
            strategy: StrategyType::ReadWrite,
        }
    }

    /// Configuration for containers where nearly every access writes
    pub const fn write_heavy() -> Self {
        Self {
            strategy: StrategyType::Mutex,
        }
    }

    /// Resolve `Auto` to a concrete strategy
    pub fn select_strategy(&self) -> StrategyType {
        match self.strategy {
            StrategyType::Auto => StrategyType::ReadWrite,
            other => other,
        }
    }
}

/// Capacity growth for `ConcurrentVec`
///
/// Amortized doubling with a minimum non-zero capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrowthPolicy {
    /// Multiplier applied to the current capacity
    pub factor: usize,
    /// Smallest capacity allocated on first growth
    pub min_capacity: usize,
}

impl GrowthPolicy {
    /// Doubling policy tuned for element size
    ///
    /// Small elements start at 8 slots, medium at 4, elements over 1 KiB at 1.
    pub const fn for_element<T>() -> Self {
        let size = std::mem::size_of::<T>();
        let min_capacity = if size == 1 {
            8
        } else if size <= 1024 {
            4
        } else {
            1
        };
        Self {
            factor: 2,
            min_capacity,
        }
    }

    /// Capacity to grow to so that at least `required` slots fit
    ///
    /// Returns `None` on arithmetic overflow.
    pub fn next_capacity(&self, current: usize, required: usize) -> Option<usize> {
        if required <= current {
            return Some(current);
        }
        let grown = current.checked_mul(self.factor.max(1))?;
        Some(grown.max(required).max(self.min_capacity))
    }
}
