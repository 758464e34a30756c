//! Helper utilities for integration tests.

pub mod assertions;
pub mod tsv_generator;

pub use assertions::*;
pub use tsv_generator::*;
