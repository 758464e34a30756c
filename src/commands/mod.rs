//! CLI command implementations for umidedup.
//!
//! - [`correct`] - Cluster and correct UMIs at each position of a coordinate-sorted input

pub mod command;
pub mod common;
pub mod correct;
