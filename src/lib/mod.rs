#![deny(unsafe_code)]
#![allow(clippy::cast_possible_truncation, clippy::module_name_repetitions)]

//! # umidedup - UMI error correction for deduplication
//!
//! Reads that share a genomic position and a unique molecular identifier (UMI) are
//! duplicates of one original molecule. Sequencing and synthesis errors make copies of one
//! molecule carry slightly different barcodes, so before duplicates can be called the
//! barcodes observed at each position must be clustered and corrected.
//!
//! ## Overview
//!
//! - **[`bundle`]** - Reading position bundles from a coordinate-sorted alignment summary
//!   and writing corrected reads
//! - **[`correction`]** - Correcting one bundle with a [`umidedup_cluster::ClusterEngine`]
//! - **[`metrics`]** - Correction metrics and TSV output
//! - **[`logging`]** / **[`progress`]** - Log formatting and progress reporting
//! - **[`validation`]** - Parameter and path validation
//! - **[`errors`]** - Error types
//!
//! The clustering itself lives in the `umidedup-cluster` crate and barcode primitives in
//! `umidedup-dna`.
//!
//! ## Quick Start
//!
//! ```
//! use std::io::Cursor;
//! use umidedup_cluster::{ClusterEngine, ClusterMethod};
//! use umidedup_lib::bundle::BundleReader;
//! use umidedup_lib::correction::correct_bundle;
//!
//! # fn main() -> anyhow::Result<()> {
//! let input = "contig\tposition\tstrand\tread\tumi\n\
//!              chr1\t100\t+\tr1\tAAAA\n\
//!              chr1\t100\t+\tr2\tAAAA\n\
//!              chr1\t100\t+\tr3\tAAAA\n\
//!              chr1\t100\t+\tr4\tAAAT\n";
//!
//! let engine = ClusterEngine::new(ClusterMethod::Directional);
//! for bundle in BundleReader::new(Cursor::new(input), "example") {
//!     let bundle = bundle?;
//!     let result = correct_bundle(&engine, &bundle, 1)?;
//!     assert_eq!(result.corrected, vec!["AAAA"; 4]);
//! }
//! # Ok(())
//! # }
//! ```

pub mod bundle;
pub mod correction;
pub mod errors;
pub mod logging;
pub mod metrics;
pub mod progress;
pub mod validation;

pub use bundle::{BundleReader, CorrectedReadWriter, PositionBundle};
pub use correction::{BundleCorrection, correct_bundle};
