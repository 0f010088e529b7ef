//! Timer for periodic background syncs.

use std::time::{Duration, Instant};

/// Fires once after `initial_delay`, then every `interval`.
///
/// The schedule knows nothing about outstanding fetches: it keeps firing and
/// the single-flight guard decides whether a tick does any work.
#[derive(Clone, Debug)]
pub struct SyncSchedule {
    next_due: Instant,
    interval: Duration,
}

impl SyncSchedule {
    pub fn new(start: Instant, initial_delay: Duration, interval: Duration) -> Self {
        Self {
            next_due: start + initial_delay,
            interval,
        }
    }

    /// Returns `true` once per elapsed period. Missed periods collapse into a
    /// single tick rather than firing in a burst.
    pub fn poll(&mut self, now: Instant) -> bool {
        if now < self.next_due {
            return false;
        }
        self.next_due += self.interval;
        if self.next_due <= now {
            self.next_due = now + self.interval;
        }
        true
    }

    pub fn next_due(&self) -> Instant {
        self.next_due
    }

    /// Time left until the next tick, zero if it is already due.
    pub fn remaining(&self, now: Instant) -> Duration {
        self.next_due.saturating_duration_since(now)
    }
}
