//! Errors raised by the clustering engine.
//!
//! There is no transient failure mode here: the engine does no I/O. A
//! [`ClusterError::LengthMismatch`] means the caller handed over a malformed bundle; the
//! `Unassigned` and `MultiplyAssigned` variants mean the engine itself is broken.

use thiserror::Error;

/// Result type alias for clustering operations.
pub type Result<T> = std::result::Result<T, ClusterError>;

/// Error type for clustering operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClusterError {
    /// Barcodes in one bundle do not all share a length.
    #[error("not all UMIs are the same length: {min} - {max}")]
    LengthMismatch {
        /// Shortest barcode length observed
        min: usize,
        /// Longest barcode length observed
        max: usize,
    },

    /// A barcode ended up in no final cluster.
    #[error("internal error: UMI '{umi}' was not assigned to any cluster")]
    Unassigned {
        /// The orphaned barcode
        umi: String,
    },

    /// A barcode ended up in more than one final cluster.
    #[error("internal error: UMI '{umi}' was assigned to {clusters} clusters")]
    MultiplyAssigned {
        /// The barcode
        umi: String,
        /// How many clusters hold it
        clusters: usize,
    },

    /// An unrecognised clustering method name.
    #[error("unknown cluster method '{name}' (expected 'directional' or 'kmeans')")]
    UnknownMethod {
        /// The name that failed to parse
        name: String,
    },
}

impl ClusterError {
    /// True for errors that indicate a defect in the engine rather than bad input.
    #[must_use]
    pub fn is_internal(&self) -> bool {
        matches!(self, ClusterError::Unassigned { .. } | ClusterError::MultiplyAssigned { .. })
    }
}
