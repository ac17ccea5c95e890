//! Time sources for trace timing.
//!
//! The tracer never reads the wall clock directly: it goes through a
//! [`TimeSource`] so that production code runs on a monotonic clock while
//! tests drive time by hand and assert exact elapsed values.
//!
//! All timestamps are [`Duration`] offsets from the source's epoch. Offsets
//! from one source must never be compared against another source's offsets.

use parking_lot::Mutex;
use std::time::{Duration, Instant};

/// Time source abstraction for reading the current time.
///
/// Implementations report elapsed time since their own epoch. The epoch is
/// arbitrary; only differences between two readings of the same source are
/// meaningful.
pub trait TimeSource: Send + Sync + 'static {
    /// Returns the time elapsed since this source's epoch.
    fn now(&self) -> Duration;
}

/// Monotonic wall-clock time source for production use.
///
/// Uses `std::time::Instant` internally. The epoch is the instant this
/// source was created.
#[derive(Debug)]
pub struct WallClock {
    epoch: Instant,
}

impl WallClock {
    /// Creates a new wall-clock time source anchored at the current instant.
    #[must_use]
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for WallClock {
    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }
}

/// Manually advanced time source for deterministic tests.
///
/// Time stands still until [`advance`](Self::advance) or
/// [`set`](Self::set) is called, so elapsed values can be asserted exactly.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Mutex<Duration>,
}

impl ManualClock {
    /// Creates a manual clock starting at the zero offset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the clock by the given duration.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now = now.saturating_add(by);
    }

    /// Sets the clock to an absolute offset from its epoch.
    pub fn set(&self, to: Duration) {
        *self.now.lock() = to;
    }
}

impl TimeSource for ManualClock {
    fn now(&self) -> Duration {
        *self.now.lock()
    }
}
