//! Wall-clock adapter.
//!
//! Implements the [`Clock`] port over `std::time::SystemTime`. Sample
//! timestamps are the only consumer; cycle timing uses monotonic
//! `Instant`s inside the scheduler and never reads this clock.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::app::ports::Clock;

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    /// Seconds since the Unix epoch. A clock set before 1970 reads as 0.
    fn now_epoch_secs(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}
