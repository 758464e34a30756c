//! Clusters and corrects UMIs at each position of a coordinate-sorted alignment summary.
//!
//! # Example
//!
//! ```no_run
//! use std::path::PathBuf;
//! use umidedup::commands::command::Command;
//! use umidedup::commands::common::{ThreadingOptions, TsvIoOptions};
//! use umidedup::commands::correct::CorrectUmis;
//! use umidedup_cluster::ClusterMethod;
//!
//! let corrector = CorrectUmis {
//!     io: TsvIoOptions { input: PathBuf::from("reads.tsv"), output: PathBuf::from("out.tsv") },
//!     metrics: Some(PathBuf::from("metrics.txt")),
//!     method: ClusterMethod::Directional,
//!     edits: 1,
//!     max_subclusters: 1,
//!     truncate_umi: None,
//!     threading: ThreadingOptions::new(4),
//!     quiet: false,
//! };
//! corrector.execute("umidedup correct").unwrap();
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use fgoxide::io::Io;
use log::info;
use rayon::prelude::*;
use umidedup_cluster::{ClusterEngine, ClusterMethod, DEFAULT_MAX_SUBCLUSTERS, DEFAULT_THRESHOLD};
use umidedup_lib::bundle::{BundleReader, CorrectedReadWriter, PositionBundle};
use umidedup_lib::correction::{BundleCorrection, correct_bundle};
use umidedup_lib::logging::{OperationTimer, log_correction_summary};
use umidedup_lib::metrics::{CorrectionMetrics, write_metrics_auto};
use umidedup_lib::progress::ProgressTracker;
use umidedup_lib::validation::{validate_output_dir, validate_positive};

use crate::commands::command::Command;
use crate::commands::common::{ThreadingOptions, TsvIoOptions};

/// Number of bundles clustered per parallel batch.
const BATCH_SIZE: usize = 1000;

/// Clusters the UMIs observed at each position and rewrites every read's UMI to its
/// cluster's representative.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "correct",
    author,
    version,
    about = "\x1b[38;5;30m[DEDUPLICATION]\x1b[0m \x1b[36mCorrect UMI sequencing errors per position\x1b[0m",
    long_about = r#"
Corrects errors in UMIs by clustering the UMIs observed at each genomic position.

The input is a coordinate-sorted, tab-separated file with the header
`contig position strand read umi` and one row per aligned read. Consecutive rows that share
`contig`, `position` and `strand` form a bundle. Within each bundle the distinct UMIs are
clustered and every read is assigned its cluster's most abundant UMI.

The output has the input's columns plus `corrected_umi`, one row per input read in input
order.

## Methods

- **directional** (default): UMI `a` absorbs UMI `b` when they are exactly `--edits` apart
  and `count(a) >= 2 * count(b) - 1`.
- **kmeans**: UMIs exactly `--edits` apart are joined regardless of counts, and each group
  is then split into at most `--max-subclusters` abundance-consistent sub-clusters.

All UMIs at one position must have the same length. Use `--truncate-umi` to cluster on a
prefix of each UMI.
"#
)]
pub struct CorrectUmis {
    #[command(flatten)]
    pub io: TsvIoOptions,

    /// Optional output file for correction metrics
    #[arg(short = 'm', long = "metrics")]
    pub metrics: Option<PathBuf>,

    /// Clustering method
    #[arg(short = 'c', long = "method", value_enum, default_value_t = ClusterMethod::Directional)]
    pub method: ClusterMethod,

    /// Hamming distance at which UMIs are considered adjacent
    #[arg(short = 'e', long = "edits", default_value_t = DEFAULT_THRESHOLD)]
    pub edits: u32,

    /// Maximum sub-clusters per group for the kmeans method
    #[arg(long = "max-subclusters", default_value_t = DEFAULT_MAX_SUBCLUSTERS)]
    pub max_subclusters: usize,

    /// Truncate UMIs to this many bases before clustering
    #[arg(long = "truncate-umi")]
    pub truncate_umi: Option<usize>,

    #[command(flatten)]
    pub threading: ThreadingOptions,

    /// Do not log progress updates
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,
}

impl Command for CorrectUmis {
    fn execute(&self, command_line: &str) -> Result<()> {
        self.validate()?;
        info!("Command line: {command_line}");

        let timer = OperationTimer::new("Correcting UMIs", "reads");
        let engine = ClusterEngine::new(self.method).with_max_subclusters(self.max_subclusters);
        info!(
            "Clustering with the {} method at {} edit(s){}",
            self.method,
            self.edits,
            self.truncate_umi.map(|n| format!(", UMIs truncated to {n} bases")).unwrap_or_default()
        );
        info!("{}", self.threading.log_message());
        let pool = self.threading.build_pool()?;

        let fgio = Io::default();
        let reader = fgio
            .new_reader(&self.io.input)
            .with_context(|| format!("Failed to open input: {}", self.io.input.display()))?;
        let writer = fgio
            .new_writer(&self.io.output)
            .with_context(|| format!("Failed to open output: {}", self.io.output.display()))?;

        let bundles = BundleReader::new(reader, self.io.input.display().to_string())
            .with_truncation(self.truncate_umi);
        let mut output = CorrectedReadWriter::new(writer)?;
        let progress = ProgressTracker::new("Processed reads").with_quiet(self.quiet);
        let mut totals = CorrectionMetrics::default();

        let mut batch: Vec<PositionBundle> = Vec::with_capacity(BATCH_SIZE);
        for bundle in bundles {
            batch.push(bundle?);
            if batch.len() == BATCH_SIZE {
                self.process_batch(&pool, &engine, &batch, &mut output, &mut totals, &progress)?;
                batch.clear();
            }
        }
        if !batch.is_empty() {
            self.process_batch(&pool, &engine, &batch, &mut output, &mut totals, &progress)?;
        }
        output.finish()?;
        progress.log_final();

        totals.finalize();
        log_correction_summary(&totals);
        if let Some(path) = &self.metrics {
            write_metrics_auto(path, std::slice::from_ref(&totals))?;
        }

        timer.log_completion(totals.reads);
        Ok(())
    }
}

impl CorrectUmis {
    /// Validates input parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is missing, an output directory does not exist, or a
    /// numeric option is out of range.
    fn validate(&self) -> Result<()> {
        self.io.validate()?;
        if let Some(metrics) = &self.metrics {
            validate_output_dir(metrics, "metrics")?;
        }
        self.threading.validate()?;
        validate_positive(self.max_subclusters, "max-subclusters")?;
        if let Some(length) = self.truncate_umi {
            validate_positive(length, "truncate-umi")?;
        }
        Ok(())
    }

    /// Clusters a batch of bundles in parallel and writes them in input order.
    fn process_batch<W: std::io::Write>(
        &self,
        pool: &rayon::ThreadPool,
        engine: &ClusterEngine,
        batch: &[PositionBundle],
        output: &mut CorrectedReadWriter<W>,
        totals: &mut CorrectionMetrics,
        progress: &ProgressTracker,
    ) -> Result<()> {
        let results: Vec<BundleCorrection> = pool.install(|| {
            batch
                .par_iter()
                .map(|bundle| correct_bundle(engine, bundle, self.edits))
                .collect::<Result<Vec<_>>>()
        })?;

        for (bundle, result) in batch.iter().zip(&results) {
            output.write_bundle(bundle, &result.corrected)?;
            totals.merge(&result.metrics);
            progress.add(bundle.len() as u64);
        }
        Ok(())
    }
}
