//! Utilities for generating alignment summary TSVs.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Header line of the input format.
pub const INPUT_HEADER: &str = "contig\tposition\tstrand\tread\tumi";

/// Accumulates input rows in order.
#[derive(Debug, Default)]
pub struct TsvBuilder {
    rows: Vec<String>,
}

impl TsvBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `depth` reads named `{prefix}_{i}` carrying `umi` at one position.
    #[must_use]
    pub fn family(
        mut self,
        contig: &str,
        position: u64,
        strand: char,
        umi: &str,
        depth: usize,
        prefix: &str,
    ) -> Self {
        for i in 0..depth {
            self.rows.push(format!("{contig}\t{position}\t{strand}\t{prefix}_{i}\t{umi}"));
        }
        self
    }

    /// Adds one raw row (fields separated by tabs).
    #[must_use]
    pub fn row(mut self, row: &str) -> Self {
        self.rows.push(row.to_string());
        self
    }

    /// Writes the header and rows to `path`.
    pub fn write(&self, path: &Path) {
        let mut text = String::from(INPUT_HEADER);
        text.push('\n');
        for row in &self.rows {
            text.push_str(row);
            text.push('\n');
        }
        fs::write(path, text).expect("Failed to write input TSV");
    }
}

/// Runs `umidedup correct` with `args` after the input and output options.
pub fn run_correct(input: &PathBuf, output: &PathBuf, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_umidedup"))
        .env("RUST_LOG", "info")
        .args(["correct", "--input", input.to_str().unwrap(), "--output", output.to_str().unwrap()])
        .args(args)
        .output()
        .expect("Failed to run correct command")
}
