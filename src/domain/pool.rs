use std::fmt;
use std::time::Duration;

/// Index of a connection slot inside a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(pub usize);

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slot-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlotState {
    #[default]
    Free,
    InUse,
}

/// Sizing of the simulated connection pool. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    /// Number of connection slots.
    pub size: usize,
    /// How long a request may queue for a slot before giving up.
    pub acquire_timeout: Duration,
}

impl PoolConfig {
    pub fn new(size: usize, acquire_timeout: Duration) -> Self {
        Self {
            size,
            acquire_timeout,
        }
    }
}

/// Point-in-time counters of a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PoolStats {
    pub size: usize,
    pub free: usize,
    pub acquired: u64,
    pub released: u64,
    pub timeouts: u64,
}
