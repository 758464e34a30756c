//! Per-bundle UMI correction.
//!
//! Bridges [`PositionBundle`]s and the clustering engine: groups a bundle's reads by barcode,
//! runs [`ClusterEngine::correct`], and turns the reassignments into one corrected barcode per
//! read plus the bundle's [`CorrectionMetrics`].

use ahash::AHashSet;
use anyhow::{Context, Result};
use umidedup_cluster::ClusterEngine;

use crate::bundle::PositionBundle;
use crate::metrics::CorrectionMetrics;

/// Result of correcting one bundle.
#[derive(Debug, Clone, PartialEq)]
pub struct BundleCorrection {
    /// Corrected barcode for each read, parallel to [`PositionBundle::reads`]
    pub corrected: Vec<String>,
    /// Counts for this bundle
    pub metrics: CorrectionMetrics,
}

/// Corrects the barcodes of one bundle.
///
/// Reads that are not reassigned keep their clustering barcode (the truncated barcode when
/// truncation is enabled).
///
/// # Errors
///
/// Returns an error naming the bundle's position if clustering fails, e.g. when its barcodes
/// differ in length.
pub fn correct_bundle(
    engine: &ClusterEngine,
    bundle: &PositionBundle,
    threshold: u32,
) -> Result<BundleCorrection> {
    let groups = bundle.umi_groups();
    let reassignments = engine
        .correct(&groups, threshold)
        .with_context(|| format!("Failed to cluster UMIs at {}", bundle.key))?;

    let mut corrected: Vec<String> =
        bundle.reads.iter().map(|read| read.cluster_umi.clone()).collect();
    let mut sources: AHashSet<&str> = AHashSet::new();
    for reassignment in &reassignments {
        let idx = *reassignment.read;
        sources.insert(bundle.reads[idx].cluster_umi.as_str());
        corrected[idx] = reassignment.umi.to_string();
    }

    let distinct_umis = groups.len() as u64;
    let umis_corrected = sources.len() as u64;
    let metrics = CorrectionMetrics {
        bundles: 1,
        reads: bundle.len() as u64,
        distinct_umis,
        clusters: distinct_umis - umis_corrected,
        umis_corrected,
        reads_corrected: reassignments.len() as u64,
        fraction_reads_corrected: 0.0,
    };

    log::trace!(
        "{}: {} reads, {} UMIs, {} reads corrected",
        bundle.key,
        metrics.reads,
        metrics.distinct_umis,
        metrics.reads_corrected
    );
    Ok(BundleCorrection { corrected, metrics })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::{AlignedRead, PositionKey, Strand};
    use umidedup_cluster::{ClusterError, ClusterMethod};

    fn bundle(umis: &[&str]) -> PositionBundle {
        PositionBundle {
            key: PositionKey { contig: "chr1".to_string(), position: 10, strand: Strand::Forward },
            reads: umis
                .iter()
                .enumerate()
                .map(|(i, umi)| AlignedRead {
                    name: format!("r{i}"),
                    umi: (*umi).to_string(),
                    cluster_umi: (*umi).to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_corrects_in_read_order() {
        let mut umis = vec!["AAAA"; 10];
        umis.insert(3, "AAAT");
        umis.extend(["TTTT"; 8]);
        let b = bundle(&umis);

        let engine = ClusterEngine::new(ClusterMethod::Directional);
        let result = correct_bundle(&engine, &b, 1).unwrap();

        assert_eq!(result.corrected.len(), 19);
        assert_eq!(result.corrected[3], "AAAA");
        assert_eq!(result.corrected[0], "AAAA");
        assert_eq!(result.corrected[18], "TTTT");

        let m = &result.metrics;
        assert_eq!(m.bundles, 1);
        assert_eq!(m.reads, 19);
        assert_eq!(m.distinct_umis, 3);
        assert_eq!(m.clusters, 2);
        assert_eq!(m.umis_corrected, 1);
        assert_eq!(m.reads_corrected, 1);
    }

    #[test]
    fn test_threshold_zero_keeps_everything() {
        let b = bundle(&["AAAA", "AAAA", "AAAT"]);
        let engine = ClusterEngine::default();
        let result = correct_bundle(&engine, &b, 0).unwrap();
        assert_eq!(result.corrected, vec!["AAAA", "AAAA", "AAAT"]);
        assert_eq!(result.metrics.reads_corrected, 0);
        assert_eq!(result.metrics.clusters, 2);
    }

    #[test]
    fn test_length_mismatch_names_position() {
        let b = bundle(&["AAAA", "AAAAT"]);
        let err = correct_bundle(&ClusterEngine::default(), &b, 1).unwrap_err();
        assert!(err.to_string().contains("chr1:10:+"));
        assert_eq!(
            err.downcast_ref::<ClusterError>(),
            Some(&ClusterError::LengthMismatch { min: 4, max: 5 })
        );
    }
}
