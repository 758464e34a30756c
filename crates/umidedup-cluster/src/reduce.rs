//! Collapses final clusters into per-read reassignments.

use ahash::AHashMap;

use crate::graph::{NodeIndex, UmiTable, select_representative};

/// Instruction to overwrite a read's barcode with its cluster's representative.
#[derive(Debug, PartialEq, Eq)]
pub struct Reassignment<'a, R> {
    /// The read to update
    pub read: &'a R,
    /// The representative barcode
    pub umi: &'a str,
}

impl<R> Clone for Reassignment<'_, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for Reassignment<'_, R> {}

/// Emits one reassignment per read filed under a non-representative member of a
/// multi-member cluster. Singleton clusters emit nothing.
#[must_use]
pub fn reduce_clusters<'a, R>(
    table: &UmiTable<'a>,
    clusters: &[Vec<NodeIndex>],
    bundle: &'a AHashMap<String, Vec<R>>,
) -> Vec<Reassignment<'a, R>> {
    let mut reassignments = Vec::new();
    for cluster in clusters.iter().filter(|c| c.len() > 1) {
        let Some(rep) = select_representative(table, cluster) else { continue };
        let umi = table.umi(rep);
        for &member in cluster.iter().filter(|&&m| m != rep) {
            if let Some(reads) = bundle.get(table.umi(member)) {
                reassignments.extend(reads.iter().map(|read| Reassignment { read, umi }));
            }
        }
    }
    reassignments
}
