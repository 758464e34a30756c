//! Metrics for the `correct` command.

use serde::{Deserialize, Serialize};

use super::Metric;

/// Summary of one UMI correction run.
///
/// Counts are accumulated per bundle and merged; the fraction is derived once at the end
/// with [`CorrectionMetrics::finalize`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorrectionMetrics {
    /// Number of position bundles clustered.
    pub bundles: u64,

    /// Number of reads across all bundles.
    pub reads: u64,

    /// Number of distinct barcodes, summed over bundles.
    pub distinct_umis: u64,

    /// Number of final clusters, summed over bundles.
    pub clusters: u64,

    /// Number of barcodes merged into another barcode's cluster.
    pub umis_corrected: u64,

    /// Number of reads whose barcode was rewritten.
    pub reads_corrected: u64,

    /// `reads_corrected / reads`.
    pub fraction_reads_corrected: f64,
}

impl CorrectionMetrics {
    /// Adds the counts of `other` into `self`.
    pub fn merge(&mut self, other: &Self) {
        self.bundles += other.bundles;
        self.reads += other.reads;
        self.distinct_umis += other.distinct_umis;
        self.clusters += other.clusters;
        self.umis_corrected += other.umis_corrected;
        self.reads_corrected += other.reads_corrected;
    }

    /// Computes the derived fraction from the accumulated counts.
    pub fn finalize(&mut self) {
        self.fraction_reads_corrected = if self.reads == 0 {
            0.0
        } else {
            #[expect(clippy::cast_precision_loss, reason = "read counts never exceed 2^53")]
            let fraction = self.reads_corrected as f64 / self.reads as f64;
            fraction
        };
    }
}

impl Metric for CorrectionMetrics {
    fn metric_name() -> &'static str {
        "UMI correction"
    }
}
