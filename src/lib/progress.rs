//! Progress tracking utilities
//!
//! A thread-safe counter that logs each time it crosses a multiple of its interval.

use log::info;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::metrics::format_count;

/// Thread-safe progress tracker for logging progress at regular intervals.
///
/// # Example
/// ```
/// use umidedup_lib::progress::ProgressTracker;
///
/// let tracker = ProgressTracker::new("Processed reads").with_interval(100);
/// for _ in 0..250 {
///     tracker.add(1); // logs at 100, 200
/// }
/// tracker.log_final(); // logs "Processed reads 250 (complete)"
/// assert_eq!(tracker.count(), 250);
/// ```
pub struct ProgressTracker {
    interval: u64,
    message: String,
    count: AtomicU64,
    quiet: bool,
}

impl ProgressTracker {
    /// Create a tracker with a default interval of 1,000,000.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self { interval: 1_000_000, message: message.into(), count: AtomicU64::new(0), quiet: false }
    }

    /// Suppress all progress logging while still counting.
    #[must_use]
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Set the logging interval. An interval of zero is treated as one.
    #[must_use]
    pub fn with_interval(mut self, interval: u64) -> Self {
        self.interval = interval.max(1);
        self
    }

    /// Add to the count, logging once for every interval boundary crossed.
    pub fn add(&self, additional: u64) {
        if additional == 0 {
            return;
        }
        let prev = self.count.fetch_add(additional, Ordering::Relaxed);
        for milestone in self.milestones(prev, prev + additional) {
            info!("{} {}", self.message, format_count(milestone));
        }
    }

    /// Interval boundaries in `(prev, now]` that should be logged.
    fn milestones(&self, prev: u64, now: u64) -> impl Iterator<Item = u64> {
        let interval = self.interval;
        let range = if self.quiet { 1..=0 } else { (prev / interval + 1)..=(now / interval) };
        range.map(move |i| i * interval)
    }

    /// The current count.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    /// Log the final count unless the last [`ProgressTracker::add`] already logged it.
    pub fn log_final(&self) {
        if self.logs_final() {
            info!("{} {} (complete)", self.message, format_count(self.count()));
        }
    }

    fn logs_final(&self) -> bool {
        let count = self.count();
        !self.quiet && (count == 0 || count % self.interval != 0)
    }
}
