//! Time source abstraction
//!
//! All deadline math in the crawler goes through an injected [`Clock`] so
//! that tests can control time instead of racing the real wall clock. The
//! engine reads the clock once to compute its deadline; every task reads it
//! again on entry to decide whether to proceed.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// A source of monotonic time
pub trait Clock: Send + Sync {
    /// Returns the current instant according to this clock
    fn now(&self) -> Instant;
}

/// The real monotonic system clock
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A manually advanced clock for tests
///
/// Starts at a fixed origin and only moves when [`ManualClock::advance`] is
/// called, so deadline behavior can be exercised deterministically.
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    offset_millis: AtomicU64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset_millis: AtomicU64::new(0),
        }
    }

    /// Moves the clock forward by the given duration
    pub fn advance(&self, by: Duration) {
        self.offset_millis
            .fetch_add(by.as_millis() as u64, Ordering::SeqCst);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + Duration::from_millis(self.offset_millis.load(Ordering::SeqCst))
    }
}
