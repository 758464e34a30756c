#![deny(unsafe_code)]

//! UMI error-correction clustering
//!
//! This crate groups the barcodes observed at one genomic position into clusters believed to
//! derive from a single true barcode, and remaps reads to each cluster's representative:
//! - Adjacency graphs under a directional or count-agnostic rule
//! - Breadth-first component discovery seeded by abundance
//! - Policy-specific post-processing (claim resolution, bounded refinement)
//! - Reduction of clusters to per-read reassignments

pub mod engine;
pub mod error;
pub mod graph;
pub mod policy;
pub mod reduce;

// Re-export commonly used items
pub use engine::{Bundle, ClusterEngine, DEFAULT_THRESHOLD, UmiCluster};
pub use error::{ClusterError, Result};
pub use graph::{AdjacencyGraph, NodeIndex, UmiTable, select_representative};
pub use policy::{
    ClusterMethod, ClusterPolicy, CountAgnosticPolicy, DEFAULT_MAX_SUBCLUSTERS, DirectionalPolicy,
};
pub use reduce::{Reassignment, reduce_clusters};
