//! Parsing and assertion helpers for command output.

#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// One row of the `correct` output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrectedRow {
    pub contig: String,
    pub position: u64,
    pub strand: String,
    pub read: String,
    pub umi: String,
    pub corrected_umi: String,
}

/// Reads the `correct` output, checking its header.
pub fn read_corrected(path: &Path) -> Vec<CorrectedRow> {
    let text = fs::read_to_string(path).expect("Failed to read output");
    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some("contig\tposition\tstrand\tread\tumi\tcorrected_umi"),
        "unexpected output header"
    );
    lines
        .map(|line| {
            let f: Vec<&str> = line.split('\t').collect();
            assert_eq!(f.len(), 6, "malformed output row: {line}");
            CorrectedRow {
                contig: f[0].to_string(),
                position: f[1].parse().expect("position"),
                strand: f[2].to_string(),
                read: f[3].to_string(),
                umi: f[4].to_string(),
                corrected_umi: f[5].to_string(),
            }
        })
        .collect()
}

/// Maps read name to corrected UMI.
pub fn corrected_by_read(rows: &[CorrectedRow]) -> HashMap<String, String> {
    rows.iter().map(|r| (r.read.clone(), r.corrected_umi.clone())).collect()
}

/// Asserts every read whose name starts with `prefix` was corrected to `expected`.
pub fn assert_family_corrected_to(rows: &[CorrectedRow], prefix: &str, expected: &str) {
    let family: Vec<&CorrectedRow> = rows.iter().filter(|r| r.read.starts_with(prefix)).collect();
    assert!(!family.is_empty(), "no reads with prefix {prefix}");
    for row in family {
        assert_eq!(row.corrected_umi, expected, "read {} corrected unexpectedly", row.read);
    }
}
