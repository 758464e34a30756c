//! Error path integration tests.
//!
//! These tests verify that invalid inputs and options make the binary exit with an error
//! and a message naming the problem.

use tempfile::TempDir;

use crate::helpers::{TsvBuilder, run_correct};

fn stderr_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn test_mixed_umi_lengths_fail() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("reads.tsv");
    let output = dir.path().join("out.tsv");
    TsvBuilder::new()
        .family("chr1", 1, '+', "AAAA", 3, "short")
        .family("chr1", 1, '+', "AAAAAA", 1, "long")
        .write(&input);

    let result = run_correct(&input, &output, &[]);
    assert!(!result.status.success());
    let stderr = stderr_of(&result);
    assert!(stderr.contains("not all UMIs are the same length: 4 - 6"), "stderr: {stderr}");
    assert!(stderr.contains("chr1:1:+"), "stderr: {stderr}");
}

#[test]
fn test_unsorted_input_fails() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("reads.tsv");
    let output = dir.path().join("out.tsv");
    TsvBuilder::new()
        .family("chr1", 10, '+', "AAAA", 1, "a")
        .family("chr2", 10, '+', "AAAA", 1, "b")
        .family("chr1", 20, '+', "AAAA", 1, "c")
        .write(&input);

    let result = run_correct(&input, &output, &[]);
    assert!(!result.status.success());
    assert!(stderr_of(&result).contains("not coordinate sorted"));
}

#[test]
fn test_malformed_row_fails() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("reads.tsv");
    let output = dir.path().join("out.tsv");
    TsvBuilder::new().row("chr1\tten\t+\tr1\tAAAA").write(&input);

    let result = run_correct(&input, &output, &[]);
    assert!(!result.status.success());
    let stderr = stderr_of(&result);
    assert!(stderr.contains("invalid position 'ten'"), "stderr: {stderr}");
    assert!(stderr.contains("line 2"), "stderr: {stderr}");
}

#[test]
fn test_missing_input_fails() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("missing.tsv");
    let output = dir.path().join("out.tsv");

    let result = run_correct(&input, &output, &[]);
    assert!(!result.status.success());
    assert!(stderr_of(&result).contains("does not exist"));
    assert!(!output.exists());
}

#[test]
fn test_unknown_method_rejected() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("reads.tsv");
    let output = dir.path().join("out.tsv");
    TsvBuilder::new().family("chr1", 1, '+', "AAAA", 1, "a").write(&input);

    let result = run_correct(&input, &output, &["--method", "cluster"]);
    assert!(!result.status.success());
    assert!(stderr_of(&result).contains("cluster"));
}

#[test]
fn test_zero_threads_rejected() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("reads.tsv");
    let output = dir.path().join("out.tsv");
    TsvBuilder::new().family("chr1", 1, '+', "AAAA", 1, "a").write(&input);

    let result = run_correct(&input, &output, &["--threads", "0"]);
    assert!(!result.status.success());
    assert!(stderr_of(&result).contains("threads"));
}

#[test]
fn test_invalid_umi_base_fails() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("reads.tsv");
    let output = dir.path().join("out.tsv");
    TsvBuilder::new().row("chr1\t1\t+\tr1\tAC.T").write(&input);

    let result = run_correct(&input, &output, &[]);
    assert!(!result.status.success());
    assert!(stderr_of(&result).contains("invalid base '.'"));
}
