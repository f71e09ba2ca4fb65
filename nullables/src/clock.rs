//! Nullable clock: deterministic time for testing.

use atlas_types::{Clock, Timestamp};
use std::sync::atomic::{AtomicU64, Ordering};

/// A deterministic clock for testing.
///
/// Time only moves when told to, or by a fixed step after every reading
/// when built with [`NullClock::ticking`].
pub struct NullClock {
    current: AtomicU64,
    step: u64,
}

impl NullClock {
    pub fn new(initial_secs: u64) -> Self {
        Self::ticking(initial_secs, 0)
    }

    /// A clock that advances by `step` seconds after each reading.
    pub fn ticking(initial_secs: u64, step: u64) -> Self {
        Self {
            current: AtomicU64::new(initial_secs),
            step,
        }
    }

    /// Advance time by a number of seconds.
    pub fn advance(&self, secs: u64) {
        self.current.fetch_add(secs, Ordering::SeqCst);
    }

    /// Set the time to a specific value.
    pub fn set(&self, secs: u64) {
        self.current.store(secs, Ordering::SeqCst);
    }
}

impl Clock for NullClock {
    fn now(&self) -> Timestamp {
        Timestamp::new(self.current.fetch_add(self.step, Ordering::SeqCst))
    }
}
