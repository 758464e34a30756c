#![deny(unsafe_code)]

//! Barcode (UMI) primitives.
//!
//! This crate provides the low-level pieces every other `umidedup` crate builds on:
//! - [`hamming_distance`] between equal-length byte sequences
//! - [`BitEnc`], a 2-bit packed barcode for fast distance computation
//! - [`validate_umi`] for classifying raw barcode strings

pub mod bitenc;
pub mod distance;

pub use bitenc::BitEnc;
pub use distance::{hamming_distance, length_range};

/// Result of validating a barcode string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UmiValidation {
    /// Barcode is made only of `ACGT` and has the given number of bases
    Valid(usize),
    /// Barcode contains a no-call
    ContainsN,
    /// Barcode contains a character outside `ACGTN`
    InvalidBase(u8),
}

/// Validates a barcode string.
///
/// Only uppercase `A`, `C`, `G`, `T` are accepted as bases. An uppercase or lowercase `N`
/// is reported as [`UmiValidation::ContainsN`]; any other byte is reported as
/// [`UmiValidation::InvalidBase`] with the first offending byte.
///
/// # Examples
///
/// ```
/// use umidedup_dna::{validate_umi, UmiValidation};
///
/// assert_eq!(validate_umi(b"ACGT"), UmiValidation::Valid(4));
/// assert_eq!(validate_umi(b"ACNT"), UmiValidation::ContainsN);
/// assert_eq!(validate_umi(b"AC-T"), UmiValidation::InvalidBase(b'-'));
/// ```
#[must_use]
pub fn validate_umi(umi: &[u8]) -> UmiValidation {
    for &b in umi {
        match b {
            b'A' | b'C' | b'G' | b'T' => {}
            b'N' | b'n' => return UmiValidation::ContainsN,
            other => return UmiValidation::InvalidBase(other),
        }
    }
    UmiValidation::Valid(umi.len())
}
