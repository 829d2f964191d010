use embassy_time::Duration;

/// Tunable timing of the matrix scanner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScanConfig {
    /// Minimum time between two sweeps of the matrix.
    ///
    /// The scanner only sweeps once more than this much time has built up
    /// since the previous sweep, so `scan` can be polled as often as the
    /// caller likes.
    pub scan_interval: Duration,
    /// Busy wait after every address line write, in microseconds.
    pub settle_time_us: u32,
}

impl ScanConfig {
    /// Interval the instrument's bring-up firmware ran with, handy when
    /// watching the diagnostic line on a scope.
    pub const DEBUG_SCAN_INTERVAL: Duration = Duration::from_millis(5000);

    pub const DEFAULT_SCAN_INTERVAL: Duration = Duration::from_millis(5);

    pub const DEFAULT_SETTLE_TIME_US: u32 = 10;

    pub const fn new() -> Self {
        Self {
            scan_interval: Self::DEFAULT_SCAN_INTERVAL,
            settle_time_us: Self::DEFAULT_SETTLE_TIME_US,
        }
    }

    pub const fn with_scan_interval(mut self, scan_interval: Duration) -> Self {
        self.scan_interval = scan_interval;
        self
    }

    pub const fn with_settle_time_us(mut self, settle_time_us: u32) -> Self {
        self.settle_time_us = settle_time_us;
        self
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::new()
    }
}
