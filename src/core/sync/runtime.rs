/*!
 * Runtime-Selected Strategy
 * Lock strategy chosen from a `LockConfig` value instead of a type parameter
 */

use super::config::{LockConfig, StrategyType};
use super::strategy::LockStrategy;
use parking_lot::{Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Strategy whose primitive is picked at construction time
///
/// # Example
///
/// ```rust
/// use concurrent_containers::{ConcurrentVec, Global, LockConfig, RuntimeStrategy};
///
/// let strategy = RuntimeStrategy::from_config(&LockConfig::write_heavy());
/// let vec: ConcurrentVec<u32, Global, RuntimeStrategy> = ConcurrentVec::with_strategy(strategy);
/// vec.push(1).unwrap();
/// assert_eq!(vec.len(), 1);
/// ```
#[derive(Debug)]
pub enum RuntimeStrategy {
    /// Readers-writer lock
    ReadWrite(RwLock<()>),
    /// Mutex, shared acquisition is exclusive
    Mutex(Mutex<()>),
}

impl RuntimeStrategy {
    /// Build the strategy a configuration asks for
    pub fn from_config(config: &LockConfig) -> Self {
        match config.select_strategy() {
            StrategyType::Mutex => Self::Mutex(Mutex::new(())),
            StrategyType::ReadWrite | StrategyType::Auto => Self::ReadWrite(RwLock::new(())),
        }
    }

    /// Concrete strategy in use
    pub fn strategy_type(&self) -> StrategyType {
        match self {
            Self::ReadWrite(_) => StrategyType::ReadWrite,
            Self::Mutex(_) => StrategyType::Mutex,
        }
    }
}

impl Default for RuntimeStrategy {
    fn default() -> Self {
        Self::from_config(&LockConfig::default())
    }
}

/// Exclusive handle of a `RuntimeStrategy`; held only for its `Drop`
pub enum RuntimeExclusive<'a> {
    Write { _guard: RwLockWriteGuard<'a, ()> },
    Mutex { _guard: MutexGuard<'a, ()> },
}

/// Shared handle of a `RuntimeStrategy`; held only for its `Drop`
pub enum RuntimeShared<'a> {
    Read { _guard: RwLockReadGuard<'a, ()> },
    Mutex { _guard: MutexGuard<'a, ()> },
}

impl LockStrategy for RuntimeStrategy {
    type Exclusive<'a> = RuntimeExclusive<'a>;
    type Shared<'a> = RuntimeShared<'a>;

    fn acquire_exclusive(&self) -> Self::Exclusive<'_> {
        match self {
            Self::ReadWrite(lock) => RuntimeExclusive::Write {
                _guard: lock.write(),
            },
            Self::Mutex(lock) => RuntimeExclusive::Mutex {
                _guard: lock.lock(),
            },
        }
    }

    fn acquire_shared(&self) -> Self::Shared<'_> {
        match self {
            Self::ReadWrite(lock) => RuntimeShared::Read {
                _guard: lock.read(),
            },
            Self::Mutex(lock) => RuntimeShared::Mutex {
                _guard: lock.lock(),
            },
        }
    }
}
