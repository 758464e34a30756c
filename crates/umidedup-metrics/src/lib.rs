#![deny(unsafe_code)]

//! Structured metric types and TSV writer for umidedup.
//!
//! This crate provides:
//! - [`Metric`] trait for metric types written as TSV
//! - [`CorrectionMetrics`] summarising a UMI correction run
//! - [`writer`] module for TSV file output

pub mod correction;
pub mod writer;

use serde::{Deserialize, Serialize};

/// Formats a count with thousands separators.
///
/// # Example
/// ```
/// use umidedup_metrics::format_count;
/// assert_eq!(format_count(1234567), "1,234,567");
/// assert_eq!(format_count(12), "12");
/// ```
#[must_use]
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// A metric type that can be serialized to TSV files.
pub trait Metric: Serialize + for<'de> Deserialize<'de> + Clone + Default {
    /// Human-readable name for this metric type, used in error messages.
    fn metric_name() -> &'static str;
}

// Re-export commonly used types
pub use correction::CorrectionMetrics;
pub use writer::{write_metrics, write_metrics_auto};
