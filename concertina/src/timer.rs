//! Self-correcting scan schedule.

use embassy_time::{Duration, Instant};

/// Elapsed-time accumulator gating the matrix sweeps.
///
/// Elapsed time is measured from `origin`. Running a scan moves the origin
/// forward by exactly one interval instead of resetting it, so time owed
/// from a late call carries over to the next due check and the schedule
/// does not drift.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScanTimer {
    origin: Instant,
    interval: Duration,
}

impl ScanTimer {
    pub fn new(interval: Duration) -> Self {
        Self::starting_at(Instant::now(), interval)
    }

    pub const fn starting_at(origin: Instant, interval: Duration) -> Self {
        Self { origin, interval }
    }

    pub fn origin(&self) -> Instant {
        self.origin
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Time accumulated at `now`.
    pub fn elapsed_at(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.origin)
    }

    /// A scan is due once the accumulated time exceeds one interval.
    pub fn is_due_at(&self, now: Instant) -> bool {
        self.elapsed_at(now) > self.interval
    }

    /// Pay for one executed scan.
    pub fn consume(&mut self) {
        self.origin += self.interval;
    }
}
