//! Fixed-interval recurrence for `run --schedule`.

use std::time::{Duration, Instant};

/// How often the scheduler wakes up to check whether a run is due.
pub const POLL_INTERVAL: Duration = Duration::from_secs(60);

/// A run every `interval`, the first one an interval after creation.
#[derive(Debug, Clone)]
pub struct Schedule {
    interval: Duration,
    next_run: Instant,
}

impl Schedule {
    pub fn every_hours(hours: u64) -> Self {
        Self::starting_at(Duration::from_secs(hours * 3600), Instant::now())
    }

    pub fn starting_at(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            next_run: now + interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.next_run
    }

    /// Time left until the next run, zero when it is due.
    pub fn remaining(&self, now: Instant) -> Duration {
        self.next_run.saturating_duration_since(now)
    }

    /// Move the next run one interval past `now`.
    ///
    /// Runs missed while a long crawl was in progress are not made up.
    pub fn advance(&mut self, now: Instant) {
        self.next_run = now + self.interval;
    }
}
