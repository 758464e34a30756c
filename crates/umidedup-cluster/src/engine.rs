//! # Clustering Engine
//!
//! [`ClusterEngine`] ties the pieces together for one bundle:
//!
//! 1. Validate that every barcode has the same length
//! 2. Count reads per barcode and order barcodes by abundance
//! 3. Build the adjacency graph under the engine's policy
//! 4. Find breadth-first components seeded in abundance order
//! 5. Post-process components into final clusters and check the partition
//! 6. Reduce clusters to `(read, representative)` reassignments
//!
//! The engine is a pure function of its inputs. It keeps no state between calls and never
//! touches a read, so bundles can be clustered concurrently from one shared engine.
//!
//! ## Example
//!
//! ```
//! use ahash::AHashMap;
//! use umidedup_cluster::{Bundle, ClusterEngine, ClusterMethod};
//!
//! let mut bundle: Bundle<u32> = AHashMap::new();
//! bundle.insert("AAAA".to_string(), (0..10).collect());
//! bundle.insert("AAAT".to_string(), vec![10]);
//! bundle.insert("TTTT".to_string(), (11..19).collect());
//!
//! let engine = ClusterEngine::new(ClusterMethod::Directional);
//! let reassignments = engine.correct(&bundle, 1).unwrap();
//!
//! assert_eq!(reassignments.len(), 1);
//! assert_eq!(*reassignments[0].read, 10);
//! assert_eq!(reassignments[0].umi, "AAAA");
//! ```

use ahash::AHashMap;

use crate::error::Result;
use crate::graph::{NodeIndex, UmiTable, connected_components, verify_partition};
use crate::policy::{ClusterMethod, ClusterPolicy, DEFAULT_MAX_SUBCLUSTERS};
use crate::reduce::{Reassignment, reduce_clusters};

/// Default hamming distance at which barcodes are considered adjacent.
pub const DEFAULT_THRESHOLD: u32 = 1;

/// Reads observed at one position, keyed by their (possibly erroneous) barcode.
pub type Bundle<R> = AHashMap<String, Vec<R>>;

/// One final cluster of barcodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UmiCluster<'a> {
    /// The most abundant barcode of the cluster
    pub representative: &'a str,
    /// All barcodes of the cluster in abundance order, representative first
    pub members: Vec<&'a str>,
    /// Total reads across all members
    pub reads: usize,
}

/// Clusters barcodes within a bundle and remaps reads to cluster representatives.
pub struct ClusterEngine {
    method: ClusterMethod,
    max_subclusters: usize,
    policy: Box<dyn ClusterPolicy>,
}

impl ClusterEngine {
    /// Creates an engine for `method`.
    #[must_use]
    pub fn new(method: ClusterMethod) -> Self {
        Self {
            method,
            max_subclusters: DEFAULT_MAX_SUBCLUSTERS,
            policy: method.new_policy(DEFAULT_MAX_SUBCLUSTERS),
        }
    }

    /// Sets the bound on sub-clusters produced by count-agnostic refinement.
    #[must_use]
    pub fn with_max_subclusters(self, max_subclusters: usize) -> Self {
        Self { policy: self.method.new_policy(max_subclusters), max_subclusters, ..self }
    }

    /// Creates an engine around a custom policy.
    #[must_use]
    pub fn with_policy(policy: Box<dyn ClusterPolicy>) -> Self {
        Self { method: policy.method(), max_subclusters: DEFAULT_MAX_SUBCLUSTERS, policy }
    }

    /// The engine's clustering method.
    #[must_use]
    pub fn method(&self) -> ClusterMethod {
        self.method
    }

    /// The bound on count-agnostic sub-clusters.
    #[must_use]
    pub fn max_subclusters(&self) -> usize {
        self.max_subclusters
    }

    /// Clusters the barcodes of `bundle` and returns one reassignment per read whose barcode
    /// is not its cluster's representative.
    ///
    /// Reads filed under a representative, and reads in singleton clusters, produce nothing.
    ///
    /// # Errors
    ///
    /// - [`crate::ClusterError::LengthMismatch`] if the barcodes differ in length
    /// - [`crate::ClusterError::Unassigned`] or [`crate::ClusterError::MultiplyAssigned`]
    ///   if the final clusters do not partition the barcodes
    pub fn correct<'a, R>(
        &self,
        bundle: &'a Bundle<R>,
        threshold: u32,
    ) -> Result<Vec<Reassignment<'a, R>>> {
        let table = UmiTable::from_bundle(bundle)?;
        let clusters = self.cluster_table(&table, threshold)?;

        let reassignments = reduce_clusters(&table, &clusters, bundle);

        log::trace!(
            "{} UMIs in {} clusters, {} reads reassigned",
            table.len(),
            clusters.len(),
            reassignments.len()
        );
        Ok(reassignments)
    }

    /// Clusters the barcodes of `bundle` and returns the final partition.
    ///
    /// Clusters are ordered by their representative's abundance.
    ///
    /// # Errors
    ///
    /// Same as [`ClusterEngine::correct`].
    pub fn clusters<'a, R>(
        &self,
        bundle: &'a Bundle<R>,
        threshold: u32,
    ) -> Result<Vec<UmiCluster<'a>>> {
        let table = UmiTable::from_bundle(bundle)?;
        let mut clusters = self.cluster_table(&table, threshold)?;
        for cluster in &mut clusters {
            cluster.sort_by(|&a, &b| table.abundance_cmp(a, b));
        }
        // Node indices follow abundance order, so the first member orders the clusters.
        clusters.sort_by_key(|cluster| cluster.first().copied());

        Ok(clusters
            .into_iter()
            .filter_map(|cluster| {
                let rep = *cluster.first()?;
                Some(UmiCluster {
                    representative: table.umi(rep),
                    members: cluster.iter().map(|&m| table.umi(m)).collect(),
                    reads: cluster.iter().map(|&m| table.count(m)).sum(),
                })
            })
            .collect())
    }

    fn cluster_table(&self, table: &UmiTable<'_>, threshold: u32) -> Result<Vec<Vec<NodeIndex>>> {
        if table.is_empty() {
            return Ok(Vec::new());
        }

        let graph = self.policy.build_adjacency(table, threshold);
        let components = connected_components(&graph);
        let clusters = self.policy.post_process(table, &graph, components)?;
        verify_partition(table, &clusters)?;
        Ok(clusters)
    }
}

impl Default for ClusterEngine {
    fn default() -> Self {
        Self::new(ClusterMethod::default())
    }
}

impl std::fmt::Debug for ClusterEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClusterEngine")
            .field("method", &self.method)
            .field("max_subclusters", &self.max_subclusters)
            .finish_non_exhaustive()
    }
}
