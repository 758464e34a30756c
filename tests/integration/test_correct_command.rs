//! End-to-end CLI tests for the correct command.
//!
//! These tests run the actual `umidedup correct` binary and validate:
//! 1. Directional and kmeans correction of a single position
//! 2. Output ordering and per-position independence
//! 3. Metrics output
//! 4. Truncation, thresholds, threading and gzip IO

use std::fs;

use tempfile::TempDir;

use crate::helpers::{
    TsvBuilder, assert_family_corrected_to, corrected_by_read, read_corrected, run_correct,
};

/// The canonical example: AAAA x10, AAAT x1, TTTT x8 at one position.
fn example_input() -> TsvBuilder {
    TsvBuilder::new()
        .family("chr1", 100, '+', "AAAA", 10, "major")
        .family("chr1", 100, '+', "AAAT", 1, "error")
        .family("chr1", 100, '+', "TTTT", 8, "other")
}

#[test]
fn test_directional_example() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("reads.tsv");
    let output = dir.path().join("out.tsv");
    example_input().write(&input);

    let result = run_correct(&input, &output, &[]);
    assert!(result.status.success(), "correct failed: {}", String::from_utf8_lossy(&result.stderr));

    let rows = read_corrected(&output);
    assert_eq!(rows.len(), 19);
    assert_family_corrected_to(&rows, "major", "AAAA");
    assert_family_corrected_to(&rows, "error", "AAAA");
    assert_family_corrected_to(&rows, "other", "TTTT");

    let changed = rows.iter().filter(|r| r.umi != r.corrected_umi).count();
    assert_eq!(changed, 1);
}

#[test]
fn test_output_preserves_input_order() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("reads.tsv");
    let output = dir.path().join("out.tsv");
    TsvBuilder::new()
        .row("chr1\t5\t+\tr1\tCCCC")
        .row("chr1\t5\t+\tr2\tCCCA")
        .row("chr1\t5\t+\tr3\tCCCC")
        .row("chr1\t5\t-\tr4\tGGGG")
        .row("chr2\t1\t+\tr5\tTTTT")
        .write(&input);

    assert!(run_correct(&input, &output, &[]).status.success());

    let rows = read_corrected(&output);
    let names: Vec<&str> = rows.iter().map(|r| r.read.as_str()).collect();
    assert_eq!(names, vec!["r1", "r2", "r3", "r4", "r5"]);
    assert_eq!(rows[1].corrected_umi, "CCCC");
    assert_eq!(rows[3].strand, "-");
    assert_eq!(rows[4].contig, "chr2");
}

#[test]
fn test_positions_are_independent() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("reads.tsv");
    let output = dir.path().join("out.tsv");
    // The rare UMI at position 200 has no abundant neighbour at its own position.
    TsvBuilder::new()
        .family("chr1", 100, '+', "AAAA", 10, "p100")
        .family("chr1", 200, '+', "AAAT", 1, "p200")
        .family("chr1", 200, '-', "AAAA", 10, "minus")
        .write(&input);

    assert!(run_correct(&input, &output, &[]).status.success());
    let by_read = corrected_by_read(&read_corrected(&output));
    assert_eq!(by_read["p200_0"], "AAAT");
}

#[test]
fn test_kmeans_merges_similar_counts() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("reads.tsv");
    let directional = dir.path().join("directional.tsv");
    let kmeans = dir.path().join("kmeans.tsv");
    TsvBuilder::new()
        .family("chr1", 100, '+', "ACGT", 10, "big")
        .family("chr1", 100, '+', "ACGA", 8, "near")
        .write(&input);

    assert!(run_correct(&input, &directional, &["--method", "directional"]).status.success());
    assert!(run_correct(&input, &kmeans, &["--method", "kmeans"]).status.success());

    assert_family_corrected_to(&read_corrected(&directional), "near", "ACGA");
    assert_family_corrected_to(&read_corrected(&kmeans), "near", "ACGT");
}

#[test]
fn test_kmeans_max_subclusters_splits() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("reads.tsv");
    let output = dir.path().join("out.tsv");
    TsvBuilder::new()
        .family("chr1", 1, '+', "AAAA", 10, "left")
        .family("chr1", 1, '+', "AATT", 9, "right")
        .family("chr1", 1, '+', "AAAT", 1, "bridge")
        .write(&input);

    let result = run_correct(&input, &output, &["-c", "kmeans", "--max-subclusters", "2"]);
    assert!(result.status.success());

    let rows = read_corrected(&output);
    assert_family_corrected_to(&rows, "left", "AAAA");
    assert_family_corrected_to(&rows, "right", "AATT");
    assert_family_corrected_to(&rows, "bridge", "AAAA");
}

#[test]
fn test_edits_option() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("reads.tsv");
    let zero = dir.path().join("zero.tsv");
    let two = dir.path().join("two.tsv");
    TsvBuilder::new()
        .family("chr1", 1, '+', "AAAA", 10, "major")
        .family("chr1", 1, '+', "AAAT", 1, "one")
        .family("chr1", 1, '+', "ATTA", 1, "two")
        .write(&input);

    assert!(run_correct(&input, &zero, &["--edits", "0"]).status.success());
    let rows = read_corrected(&zero);
    assert!(rows.iter().all(|r| r.umi == r.corrected_umi));

    assert!(run_correct(&input, &two, &["-e", "2"]).status.success());
    let by_read = corrected_by_read(&read_corrected(&two));
    assert_eq!(by_read["one_0"], "AAAT");
    assert_eq!(by_read["two_0"], "AAAA");
}

#[test]
fn test_metrics_output() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("reads.tsv");
    let output = dir.path().join("out.tsv");
    let metrics = dir.path().join("metrics.txt");
    example_input().family("chr2", 7, '-', "GGGG", 2, "lone").write(&input);

    let result = run_correct(&input, &output, &["--metrics", metrics.to_str().unwrap()]);
    assert!(result.status.success());

    let text = fs::read_to_string(&metrics).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(
        lines[0],
        "bundles\treads\tdistinct_umis\tclusters\tumis_corrected\treads_corrected\tfraction_reads_corrected"
    );
    let values: Vec<&str> = lines[1].split('\t').collect();
    assert_eq!(&values[..6], &["2", "21", "4", "3", "1", "1"]);
}

#[test]
fn test_truncate_umi() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("reads.tsv");
    let output = dir.path().join("out.tsv");
    TsvBuilder::new()
        .family("chr1", 1, '+', "AAAACG", 5, "major")
        .family("chr1", 1, '+', "AAATGC", 1, "minor")
        .write(&input);

    assert!(run_correct(&input, &output, &["--truncate-umi", "4"]).status.success());

    let rows = read_corrected(&output);
    assert_eq!(rows[0].umi, "AAAACG");
    assert_family_corrected_to(&rows, "major", "AAAA");
    assert_family_corrected_to(&rows, "minor", "AAAA");
}

#[test]
fn test_threads_produce_identical_output() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("reads.tsv");
    let single = dir.path().join("single.tsv");
    let multi = dir.path().join("multi.tsv");

    let mut builder = TsvBuilder::new();
    for pos in 0..2_500u64 {
        builder = builder
            .family("chr1", pos, '+', "ACGTAC", 4, &format!("a{pos}"))
            .family("chr1", pos, '+', "ACGTAA", 1, &format!("b{pos}"))
            .family("chr1", pos, '+', "TTTTTT", (pos % 3) as usize + 1, &format!("c{pos}"));
    }
    builder.write(&input);

    assert!(run_correct(&input, &single, &["--threads", "1"]).status.success());
    assert!(run_correct(&input, &multi, &["--threads", "4"]).status.success());

    assert_eq!(fs::read(&single).unwrap(), fs::read(&multi).unwrap());
    let rows = read_corrected(&multi);
    assert!(rows.iter().filter(|r| r.read.starts_with('b')).all(|r| r.corrected_umi == "ACGTAC"));
}

#[test]
fn test_gzip_output() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("reads.tsv");
    let output = dir.path().join("out.tsv.gz");
    example_input().write(&input);

    assert!(run_correct(&input, &output, &[]).status.success());
    let bytes = fs::read(&output).unwrap();
    assert_eq!(&bytes[..2], &[0x1f, 0x8b], "output should be gzip compressed");
}

#[test]
fn test_empty_input() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("reads.tsv");
    let output = dir.path().join("out.tsv");
    TsvBuilder::new().write(&input);

    assert!(run_correct(&input, &output, &[]).status.success());
    assert!(read_corrected(&output).is_empty());
}

#[test]
fn test_quiet_suppresses_progress() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("reads.tsv");
    let loud = dir.path().join("loud.tsv");
    let quiet = dir.path().join("quiet.tsv");
    example_input().write(&input);

    let result = run_correct(&input, &loud, &[]);
    assert!(result.status.success());
    assert!(String::from_utf8_lossy(&result.stderr).contains("Processed reads 19 (complete)"));

    let result = run_correct(&input, &quiet, &["--quiet"]);
    assert!(result.status.success());
    assert!(!String::from_utf8_lossy(&result.stderr).contains("Processed reads"));
    assert_eq!(fs::read(&loud).unwrap(), fs::read(&quiet).unwrap());
}
