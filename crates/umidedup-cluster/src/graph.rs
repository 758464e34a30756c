//! # Barcode Graphs
//!
//! The building blocks shared by both clustering policies:
//!
//! - [`UmiTable`] - the distinct barcodes of one bundle with their counts, in abundance order
//! - [`AdjacencyGraph`] - per-barcode out-edges under a policy's adjacency rule
//! - [`connected_components`] - breadth-first partitioning seeded by abundance
//! - [`select_representative`] - the most abundant barcode of a cluster
//!
//! ## Node ordering
//!
//! Every barcode is identified by its index into the [`UmiTable`]. The table is sorted by
//! descending count, then ascending barcode, so that index order *is* abundance order. Seeds
//! for component discovery are taken in index order, which makes the seeding deterministic
//! and gives the directional policy a fixed winner for ambiguous claims.

use std::cmp::Ordering;
use std::collections::VecDeque;

use ahash::{AHashMap, AHashSet};
use umidedup_dna::{BitEnc, hamming_distance, length_range};

use crate::error::{ClusterError, Result};

/// Index of a barcode in a [`UmiTable`].
pub type NodeIndex = usize;

/// The directional count rule: a barcode observed `parent` times may absorb one observed
/// `child` times iff `parent >= 2 * child - 1`.
///
/// # Examples
///
/// ```
/// use umidedup_cluster::graph::directional_admits;
///
/// assert!(directional_admits(10, 1));
/// assert!(directional_admits(3, 2));
/// assert!(!directional_admits(8, 10));
/// assert!(directional_admits(1, 1));
/// ```
#[inline]
#[must_use]
pub fn directional_admits(parent: usize, child: usize) -> bool {
    parent + 1 >= 2 * child
}

/// The distinct barcodes of one bundle, their counts, and (when possible) packed encodings.
#[derive(Debug)]
pub struct UmiTable<'a> {
    umis: Vec<&'a str>,
    counts: Vec<usize>,
    packed: Option<Vec<BitEnc>>,
}

impl<'a> UmiTable<'a> {
    /// Builds a table from `(barcode, count)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`ClusterError::LengthMismatch`] if the barcodes differ in length.
    pub fn new<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, usize)>,
    {
        let mut entries: Vec<(&'a str, usize)> = entries.into_iter().collect();

        if let Some((min, max)) = length_range(entries.iter().map(|(umi, _)| umi.as_bytes())) {
            if min != max {
                return Err(ClusterError::LengthMismatch { min, max });
            }
        }

        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

        let (umis, counts): (Vec<&'a str>, Vec<usize>) = entries.into_iter().unzip();
        let packed = BitEnc::pack_all(umis.iter().map(|umi| umi.as_bytes()));
        Ok(Self { umis, counts, packed })
    }

    /// Builds a table from a bundle, counting reads per barcode.
    ///
    /// # Errors
    ///
    /// Returns [`ClusterError::LengthMismatch`] if the barcodes differ in length.
    pub fn from_bundle<R>(bundle: &'a AHashMap<String, Vec<R>>) -> Result<Self> {
        Self::new(bundle.iter().map(|(umi, reads)| (umi.as_str(), reads.len())))
    }

    /// Number of distinct barcodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.umis.len()
    }

    /// True if the table holds no barcodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.umis.is_empty()
    }

    /// The barcode at `idx`.
    #[must_use]
    pub fn umi(&self, idx: NodeIndex) -> &'a str {
        self.umis[idx]
    }

    /// The number of reads observed with the barcode at `idx`.
    #[must_use]
    pub fn count(&self, idx: NodeIndex) -> usize {
        self.counts[idx]
    }

    /// True if the packed fast path is in use for distance computation.
    #[must_use]
    pub fn is_packed(&self) -> bool {
        self.packed.is_some()
    }

    /// Hamming distance between the barcodes at `a` and `b`.
    #[inline]
    #[must_use]
    pub fn distance(&self, a: NodeIndex, b: NodeIndex) -> u32 {
        match &self.packed {
            Some(packed) => packed[a].hamming_distance(&packed[b]),
            None => hamming_distance(self.umis[a].as_bytes(), self.umis[b].as_bytes()),
        }
    }

    /// Orders two barcodes by abundance: higher count first, then lexicographically smaller.
    #[must_use]
    pub fn abundance_cmp(&self, a: NodeIndex, b: NodeIndex) -> Ordering {
        self.counts[b].cmp(&self.counts[a]).then_with(|| self.umis[a].cmp(self.umis[b]))
    }
}

/// Out-edges for every barcode of a [`UmiTable`].
///
/// Edge lists are kept in ascending node order, so traversals over the graph are
/// deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacencyGraph {
    edges: Vec<Vec<NodeIndex>>,
}

impl AdjacencyGraph {
    /// Builds the graph: `a -> b` iff `distance(a, b) == threshold` and `admits(a, b)`.
    ///
    /// Self-edges are never added. Every unordered pair is compared once, so the cost is
    /// quadratic in the number of distinct barcodes at the position.
    pub fn build<F>(table: &UmiTable<'_>, threshold: u32, admits: F) -> Self
    where
        F: Fn(NodeIndex, NodeIndex) -> bool,
    {
        let n = table.len();
        let mut edges: Vec<Vec<NodeIndex>> = vec![Vec::new(); n];

        // Distinct barcodes are never at distance zero.
        if threshold == 0 {
            return Self { edges };
        }

        for a in 0..n {
            for b in (a + 1)..n {
                if table.distance(a, b) != threshold {
                    continue;
                }
                if admits(a, b) {
                    edges[a].push(b);
                }
                if admits(b, a) {
                    edges[b].push(a);
                }
            }
        }

        Self { edges }
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// True if the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Nodes reachable in one step from `node`.
    #[must_use]
    pub fn neighbors(&self, node: NodeIndex) -> &[NodeIndex] {
        &self.edges[node]
    }

    /// True if `a -> b` is an edge.
    #[must_use]
    pub fn is_adjacent(&self, a: NodeIndex, b: NodeIndex) -> bool {
        self.edges[a].binary_search(&b).is_ok()
    }

    /// Total number of directed edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.iter().map(Vec::len).sum()
    }

    /// All nodes reachable from `seed` (including `seed`), in ascending order.
    #[must_use]
    pub fn reachable_from(&self, seed: NodeIndex) -> Vec<NodeIndex> {
        let mut found: AHashSet<NodeIndex> = AHashSet::new();
        let mut queue = VecDeque::new();
        found.insert(seed);
        queue.push_back(seed);

        while let Some(node) = queue.pop_front() {
            for &next in &self.edges[node] {
                if found.insert(next) {
                    queue.push_back(next);
                }
            }
        }

        let mut component: Vec<NodeIndex> = found.into_iter().collect();
        component.sort_unstable();
        component
    }
}

/// Partitions the graph into components by breadth-first search.
///
/// Seeds are taken in node order (descending abundance). A node already found by an earlier
/// traversal is never used as a seed, but a later traversal may still reach it: with an
/// asymmetric graph this is how one barcode ends up claimed by several components, which the
/// directional policy then reconciles. With a symmetric graph the components are disjoint.
#[must_use]
pub fn connected_components(graph: &AdjacencyGraph) -> Vec<Vec<NodeIndex>> {
    let mut found = vec![false; graph.len()];
    let mut components = Vec::new();

    for seed in 0..graph.len() {
        if found[seed] {
            continue;
        }
        let component = graph.reachable_from(seed);
        for &node in &component {
            found[node] = true;
        }
        components.push(component);
    }

    components
}

/// Returns the most abundant member of `cluster`: highest count, ties going to the
/// lexicographically smallest barcode. Returns `None` for an empty cluster.
#[must_use]
pub fn select_representative(table: &UmiTable<'_>, cluster: &[NodeIndex]) -> Option<NodeIndex> {
    cluster.iter().copied().min_by(|&a, &b| table.abundance_cmp(a, b))
}

/// Checks that every node of `table` sits in exactly one of `clusters`.
///
/// # Errors
///
/// Returns [`ClusterError::Unassigned`] or [`ClusterError::MultiplyAssigned`] for the first
/// offending barcode in abundance order.
pub fn verify_partition(table: &UmiTable<'_>, clusters: &[Vec<NodeIndex>]) -> Result<()> {
    let mut seen = vec![0usize; table.len()];
    for &node in clusters.iter().flatten() {
        seen[node] += 1;
    }

    for (node, &times) in seen.iter().enumerate() {
        match times {
            1 => {}
            0 => return Err(ClusterError::Unassigned { umi: table.umi(node).to_string() }),
            n => {
                return Err(ClusterError::MultiplyAssigned {
                    umi: table.umi(node).to_string(),
                    clusters: n,
                });
            }
        }
    }
    Ok(())
}
