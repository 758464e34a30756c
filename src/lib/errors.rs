//! Custom error types for umidedup operations.

use thiserror::Error;

/// Result type alias for umidedup operations
pub type Result<T> = std::result::Result<T, UmidedupError>;

/// Error type for umidedup operations
#[derive(Error, Debug)]
pub enum UmidedupError {
    /// Invalid parameter value provided
    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        /// The parameter name
        parameter: String,
        /// Explanation of why it's invalid
        reason: String,
    },

    /// A required file or directory is missing
    #[error("{description} '{path}' does not exist")]
    MissingFile {
        /// Human-readable description of the file
        description: String,
        /// Path that was checked
        path: String,
    },

    /// File format error
    #[error("Invalid {file_type} file '{path}' at line {line}: {reason}")]
    InvalidFileFormat {
        /// Type of file (e.g., "alignment TSV")
        file_type: String,
        /// Path to the file
        path: String,
        /// One-based line number of the offending record
        line: u64,
        /// Explanation of the problem
        reason: String,
    },

    /// Input is not coordinate-sorted
    #[error(
        "Input '{path}' is not coordinate sorted: position {contig}:{position}:{strand} at line {line} is out of coordinate order"
    )]
    UnsortedInput {
        /// Path to the file
        path: String,
        /// Contig of the revisited position
        contig: String,
        /// Revisited position
        position: u64,
        /// Strand of the revisited position
        strand: char,
        /// One-based line number where the position reappeared
        line: u64,
    },
}
