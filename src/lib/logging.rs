//! Formatting helpers for log output.
//!
//! Used by commands to report progress, timing, and the end-of-run correction summary in a
//! consistent style.

use std::time::{Duration, Instant};

use crate::metrics::CorrectionMetrics;
pub use crate::metrics::format_count;

/// Formats a fraction (0.0-1.0) as a percentage with `decimals` places.
///
/// # Examples
///
/// ```
/// use umidedup_lib::logging::format_percent;
///
/// assert_eq!(format_percent(0.9543, 2), "95.43%");
/// assert_eq!(format_percent(1.0, 0), "100%");
/// ```
#[must_use]
pub fn format_percent(value: f64, decimals: usize) -> String {
    format!("{:.decimals$}%", value * 100.0)
}

/// Formats a duration as e.g. `45s`, `2m 15s` or `1h 30m`.
///
/// # Examples
///
/// ```
/// use umidedup_lib::logging::format_duration;
/// use std::time::Duration;
///
/// assert_eq!(format_duration(Duration::from_secs(135)), "2m 15s");
/// assert_eq!(format_duration(Duration::from_secs(5400)), "1h 30m");
/// ```
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let (major, minor, units) = match secs {
        0..60 => return format!("{secs}s"),
        60..3600 => (secs / 60, secs % 60, ("m", "s")),
        _ => (secs / 3600, (secs % 3600) / 60, ("h", "m")),
    };
    if minor == 0 {
        format!("{major}{}", units.0)
    } else {
        format!("{major}{} {minor}{}", units.0, units.1)
    }
}

/// Formats a throughput of `count` `unit`s over `duration`, falling back to per-minute
/// rates below one per second.
///
/// # Examples
///
/// ```
/// use umidedup_lib::logging::format_rate;
/// use std::time::Duration;
///
/// assert_eq!(format_rate(1000, Duration::from_secs(1), "reads"), "1,000 reads/s");
/// assert_eq!(format_rate(30, Duration::from_secs(60), "bundles"), "30.0 bundles/min");
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_rate(count: u64, duration: Duration, unit: &str) -> String {
    let secs = duration.as_secs_f64();
    if secs < 0.001 {
        return format!("{} {unit}/s", format_count(count));
    }

    let rate = count as f64 / secs;
    if rate >= 1.0 {
        format!("{} {unit}/s", format_count(rate as u64))
    } else {
        format!("{:.1} {unit}/min", rate * 60.0)
    }
}

/// Logs the end-of-run summary of a UMI correction.
///
/// # Examples
///
/// ```no_run
/// use umidedup_lib::logging::log_correction_summary;
/// use umidedup_lib::metrics::CorrectionMetrics;
///
/// let mut metrics = CorrectionMetrics { reads: 10_000, reads_corrected: 250, ..Default::default() };
/// metrics.finalize();
///
/// log_correction_summary(&metrics);
/// ```
pub fn log_correction_summary(metrics: &CorrectionMetrics) {
    log::info!("UMI Correction Summary:");
    log::info!("  Bundles: {}", format_count(metrics.bundles));
    log::info!("  Reads: {}", format_count(metrics.reads));
    log::info!("  Distinct UMIs: {}", format_count(metrics.distinct_umis));
    log::info!("  Clusters: {}", format_count(metrics.clusters));
    log::info!("  UMIs corrected: {}", format_count(metrics.umis_corrected));
    log::info!(
        "  UMI sequence corrections: {} ({})",
        format_count(metrics.reads_corrected),
        format_percent(metrics.fraction_reads_corrected, 2)
    );
}

/// Times an operation and logs its start and completion.
///
/// # Examples
///
/// ```no_run
/// use umidedup_lib::logging::OperationTimer;
///
/// let timer = OperationTimer::new("Correcting UMIs", "reads");
/// // ... do work ...
/// timer.log_completion(10_000);
/// ```
pub struct OperationTimer {
    operation: String,
    unit: String,
    start_time: Instant,
}

impl OperationTimer {
    /// Starts the timer and logs the operation name.
    #[must_use]
    pub fn new(operation: &str, unit: &str) -> Self {
        log::info!("{operation} ...");
        Self { operation: operation.to_string(), unit: unit.to_string(), start_time: Instant::now() }
    }

    /// Time since the timer started.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Logs completion with the number of items processed and the rate.
    pub fn log_completion(&self, count: u64) {
        let duration = self.elapsed();
        log::info!(
            "{} completed: {} {} in {} ({})",
            self.operation,
            format_count(count),
            self.unit,
            format_duration(duration),
            format_rate(count, duration, &self.unit)
        );
    }
}
