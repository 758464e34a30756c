//! Input validation utilities
//!
//! Common validation functions for command-line parameters and file paths with consistent
//! error messages, reported through [`crate::errors::UmidedupError`].

use crate::errors::{Result, UmidedupError};
use std::fmt::Display;
use std::path::Path;

/// Validate that a file exists
///
/// # Arguments
/// * `path` - Path to validate
/// * `description` - Human-readable description of the file (e.g., "Input TSV")
///
/// # Errors
/// Returns an error if the file does not exist
///
/// # Example
/// ```
/// use umidedup_lib::validation::validate_file_exists;
///
/// let result = validate_file_exists("/nonexistent/reads.tsv", "Input TSV");
/// assert!(result.is_err());
/// ```
pub fn validate_file_exists<P: AsRef<Path>>(path: P, description: &str) -> Result<()> {
    let path_ref = path.as_ref();
    if !path_ref.is_file() {
        return Err(UmidedupError::MissingFile {
            description: description.to_string(),
            path: path_ref.display().to_string(),
        });
    }
    Ok(())
}

/// Validate that the directory an output file will be written into exists
///
/// A bare file name (no parent component) is always accepted.
///
/// # Errors
/// Returns an error if the parent directory does not exist
pub fn validate_output_dir<P: AsRef<Path>>(path: P, description: &str) -> Result<()> {
    match path.as_ref().parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.is_dir() => {
            Err(UmidedupError::MissingFile {
                description: format!("Directory for {description}"),
                path: parent.display().to_string(),
            })
        }
        _ => Ok(()),
    }
}

/// Validate that a value is positive (> 0)
///
/// # Errors
/// Returns an error if the value is not positive
///
/// # Example
/// ```
/// use umidedup_lib::validation::validate_positive;
///
/// validate_positive(4, "truncate-umi").unwrap();
///
/// let result = validate_positive(0, "truncate-umi");
/// assert!(result.is_err());
/// ```
#[allow(clippy::needless_pass_by_value)]
pub fn validate_positive<T: Ord + Display + Default>(value: T, name: &str) -> Result<()> {
    if value <= T::default() {
        return Err(UmidedupError::InvalidParameter {
            parameter: name.to_string(),
            reason: format!("Must be positive (> 0), got: {value}"),
        });
    }
    Ok(())
}
