//! Position bundles read from a coordinate-sorted alignment summary.
//!
//! The input is a tab-separated file with the header
//!
//! ```text
//! contig  position  strand  read  umi
//! ```
//!
//! and one row per aligned read. Consecutive rows sharing `(contig, position, strand)` form
//! one [`PositionBundle`]. The file must be coordinate sorted: within a contig positions never
//! decrease, and a contig (or a strand at one position) is never revisited once left.
//! Barcodes are uppercase `ACGT` with optional `N` no-calls.
//!
//! [`BundleReader`] streams bundles from any `BufRead`; [`CorrectedReadWriter`] writes the
//! per-read output of the `correct` command.

use std::fmt;
use std::io::{BufRead, Write};
use std::str::FromStr;

use ahash::AHashSet;
use anyhow::{Context, Result};
use umidedup_cluster::Bundle;
use umidedup_dna::{UmiValidation, validate_umi};

use crate::errors::UmidedupError;

/// Column names of the input file, in order.
pub const INPUT_HEADER: [&str; 5] = ["contig", "position", "strand", "read", "umi"];

/// Column names of the output file, in order.
pub const OUTPUT_HEADER: [&str; 6] = ["contig", "position", "strand", "read", "umi", "corrected_umi"];

/// Strand of an alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Strand {
    /// `+`
    Forward,
    /// `-`
    Reverse,
}

impl Strand {
    /// The single-character symbol for this strand.
    #[must_use]
    pub fn symbol(self) -> char {
        match self {
            Strand::Forward => '+',
            Strand::Reverse => '-',
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for Strand {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "+" => Ok(Strand::Forward),
            "-" => Ok(Strand::Reverse),
            other => Err(format!("strand must be '+' or '-', got '{other}'")),
        }
    }
}

/// Genomic key shared by every read in a bundle.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PositionKey {
    /// Reference sequence name
    pub contig: String,
    /// Alignment position
    pub position: u64,
    /// Alignment strand
    pub strand: Strand,
}

impl fmt::Display for PositionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.contig, self.position, self.strand)
    }
}

/// One row of the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedRead {
    /// Read name
    pub name: String,
    /// Barcode as it appears in the input
    pub umi: String,
    /// Barcode used for clustering (truncated when requested)
    pub cluster_umi: String,
}

/// All reads observed at one `(contig, position, strand)`, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionBundle {
    /// The bundle's position
    pub key: PositionKey,
    /// Reads in input order
    pub reads: Vec<AlignedRead>,
}

impl PositionBundle {
    /// Groups the bundle's reads by clustering barcode. Reads are represented by their index
    /// into [`PositionBundle::reads`].
    #[must_use]
    pub fn umi_groups(&self) -> Bundle<usize> {
        let mut groups = Bundle::<usize>::new();
        for (idx, read) in self.reads.iter().enumerate() {
            groups.entry(read.cluster_umi.clone()).or_default().push(idx);
        }
        groups
    }

    /// Number of reads in the bundle.
    #[must_use]
    pub fn len(&self) -> usize {
        self.reads.len()
    }

    /// True if the bundle holds no reads.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reads.is_empty()
    }
}

/// Truncates `umi` to its first `length` bases. Shorter barcodes are returned unchanged.
///
/// # Examples
///
/// ```
/// use umidedup_lib::bundle::truncate_umi;
///
/// assert_eq!(truncate_umi("ACGTACGT", Some(4)), "ACGT");
/// assert_eq!(truncate_umi("ACG", Some(4)), "ACG");
/// assert_eq!(truncate_umi("ACGT", None), "ACGT");
/// ```
#[must_use]
pub fn truncate_umi(umi: &str, length: Option<usize>) -> &str {
    match length {
        Some(n) => umi.get(..n).unwrap_or(umi),
        None => umi,
    }
}

/// Tracks what has been seen so far to detect unsorted input.
#[derive(Debug, Default)]
struct SortTracker {
    finished_contigs: AHashSet<String>,
    current: Option<(String, u64)>,
    strands_at_position: Vec<Strand>,
}

impl SortTracker {
    /// Registers the start of a new bundle. Returns false if `key` breaks coordinate order.
    fn enter(&mut self, key: &PositionKey) -> bool {
        match &self.current {
            Some((contig, position)) if *contig == key.contig => {
                if key.position < *position {
                    return false;
                }
                if key.position > *position {
                    self.strands_at_position.clear();
                }
            }
            Some((contig, _)) => {
                self.finished_contigs.insert(contig.clone());
                if self.finished_contigs.contains(&key.contig) {
                    return false;
                }
                self.strands_at_position.clear();
            }
            None => {}
        }
        if self.strands_at_position.contains(&key.strand) {
            return false;
        }
        self.strands_at_position.push(key.strand);
        self.current = Some((key.contig.clone(), key.position));
        true
    }
}

/// Streams [`PositionBundle`]s from a coordinate-sorted alignment summary.
pub struct BundleReader<R: BufRead> {
    reader: R,
    source: String,
    truncate: Option<usize>,
    line_number: u64,
    line: String,
    pending: Option<(PositionKey, AlignedRead)>,
    tracker: SortTracker,
    header_checked: bool,
    done: bool,
}

impl<R: BufRead> BundleReader<R> {
    /// Creates a reader. `source` names the input in error messages.
    pub fn new(reader: R, source: impl Into<String>) -> Self {
        Self {
            reader,
            source: source.into(),
            truncate: None,
            line_number: 0,
            line: String::new(),
            pending: None,
            tracker: SortTracker::default(),
            header_checked: false,
            done: false,
        }
    }

    /// Truncates every barcode to its first `length` bases before grouping.
    #[must_use]
    pub fn with_truncation(mut self, length: Option<usize>) -> Self {
        self.truncate = length;
        self
    }

    fn format_error(&self, reason: impl Into<String>) -> anyhow::Error {
        UmidedupError::InvalidFileFormat {
            file_type: "alignment TSV".to_string(),
            path: self.source.clone(),
            line: self.line_number,
            reason: reason.into(),
        }
        .into()
    }

    /// Reads the next non-empty line into `self.line`. Returns false at end of input.
    fn next_line(&mut self) -> Result<bool> {
        loop {
            self.line.clear();
            let n = self
                .reader
                .read_line(&mut self.line)
                .with_context(|| format!("Failed to read from {}", self.source))?;
            if n == 0 {
                return Ok(false);
            }
            self.line_number += 1;
            if !self.line.trim_end_matches(['\n', '\r']).is_empty() {
                return Ok(true);
            }
        }
    }

    fn check_header(&mut self) -> Result<()> {
        self.header_checked = true;
        if !self.next_line()? {
            return Ok(());
        }
        let columns: Vec<&str> = self.line.trim_end_matches(['\n', '\r']).split('\t').collect();
        if columns != INPUT_HEADER {
            return Err(self.format_error(format!(
                "expected header '{}', found '{}'",
                INPUT_HEADER.join("\t"),
                columns.join("\t")
            )));
        }
        Ok(())
    }

    fn parse_record(&self) -> Result<(PositionKey, AlignedRead)> {
        let fields: Vec<&str> = self.line.trim_end_matches(['\n', '\r']).split('\t').collect();
        let [contig, position, strand, name, umi] = fields[..] else {
            return Err(self.format_error(format!(
                "expected {} columns, found {}",
                INPUT_HEADER.len(),
                fields.len()
            )));
        };

        let position = position
            .parse::<u64>()
            .map_err(|_| self.format_error(format!("invalid position '{position}'")))?;
        let strand = strand.parse::<Strand>().map_err(|e| self.format_error(e))?;
        if umi.is_empty() {
            return Err(self.format_error(format!("read '{name}' has an empty UMI")));
        }
        if let UmiValidation::InvalidBase(base) = validate_umi(umi.as_bytes()) {
            return Err(self.format_error(format!(
                "read '{name}' has UMI '{umi}' with invalid base '{}'",
                char::from(base)
            )));
        }

        let key = PositionKey { contig: contig.to_string(), position, strand };
        let read = AlignedRead {
            name: name.to_string(),
            umi: umi.to_string(),
            cluster_umi: truncate_umi(umi, self.truncate).to_string(),
        };
        Ok((key, read))
    }

    /// Reads the next record, or `None` at end of input.
    fn next_record(&mut self) -> Result<Option<(PositionKey, AlignedRead)>> {
        if !self.next_line()? {
            return Ok(None);
        }
        self.parse_record().map(Some)
    }

    fn next_bundle(&mut self) -> Result<Option<PositionBundle>> {
        if !self.header_checked {
            self.check_header()?;
        }

        let (key, first) = match self.pending.take() {
            Some(record) => record,
            None => match self.next_record()? {
                Some(record) => record,
                None => return Ok(None),
            },
        };

        if !self.tracker.enter(&key) {
            return Err(UmidedupError::UnsortedInput {
                path: self.source.clone(),
                contig: key.contig,
                position: key.position,
                strand: key.strand.symbol(),
                line: self.line_number,
            }
            .into());
        }

        let mut reads = vec![first];
        while let Some((next_key, read)) = self.next_record()? {
            if next_key == key {
                reads.push(read);
            } else {
                self.pending = Some((next_key, read));
                break;
            }
        }
        Ok(Some(PositionBundle { key, reads }))
    }
}

impl<R: BufRead> Iterator for BundleReader<R> {
    type Item = Result<PositionBundle>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let result = self.next_bundle().transpose();
        if !matches!(result, Some(Ok(_))) {
            self.done = true;
        }
        result
    }
}

/// Writes one output row per read with its corrected barcode.
pub struct CorrectedReadWriter<W: Write> {
    writer: W,
}

impl<W: Write> CorrectedReadWriter<W> {
    /// Creates the writer and emits the header.
    ///
    /// # Errors
    ///
    /// Returns an error if the header cannot be written.
    pub fn new(mut writer: W) -> Result<Self> {
        writeln!(writer, "{}", OUTPUT_HEADER.join("\t")).context("Failed to write header")?;
        Ok(Self { writer })
    }

    /// Writes every read of `bundle` in input order. `corrected[i]` is the barcode to report
    /// for `bundle.reads[i]`.
    ///
    /// # Errors
    ///
    /// Returns an error if a row cannot be written.
    pub fn write_bundle(&mut self, bundle: &PositionBundle, corrected: &[String]) -> Result<()> {
        let key = &bundle.key;
        for (read, umi) in bundle.reads.iter().zip(corrected) {
            writeln!(
                self.writer,
                "{}\t{}\t{}\t{}\t{}\t{}",
                key.contig, key.position, key.strand, read.name, read.umi, umi
            )
            .context("Failed to write corrected read")?;
        }
        Ok(())
    }

    /// Flushes and returns the inner writer.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing fails.
    pub fn finish(mut self) -> Result<W> {
        self.writer.flush().context("Failed to flush output")?;
        Ok(self.writer)
    }
}
