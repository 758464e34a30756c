//! Common CLI options shared across commands.
//!
//! Argument structures composed into command structs with `#[command(flatten)]`.

use std::path::PathBuf;

use clap::Args;

use umidedup_lib::validation::{validate_file_exists, validate_output_dir, validate_positive};

/// Input/output options for commands that read and write alignment summary TSVs.
#[derive(Debug, Clone, Args)]
pub struct TsvIoOptions {
    /// Input TSV of aligned reads (`.gz` accepted)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,

    /// Output TSV of corrected reads (`.gz` to compress)
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,
}

impl TsvIoOptions {
    /// Validates that the input file exists and the output directory is present.
    ///
    /// # Errors
    ///
    /// Returns an error if either check fails.
    pub fn validate(&self) -> anyhow::Result<()> {
        validate_file_exists(&self.input, "Input TSV")?;
        validate_output_dir(&self.output, "output TSV")?;
        Ok(())
    }
}

/// Threading options.
#[derive(Debug, Clone, Args)]
pub struct ThreadingOptions {
    /// Number of threads used to cluster bundles in parallel
    #[arg(short = 't', long = "threads", default_value_t = 1)]
    pub threads: usize,
}

impl Default for ThreadingOptions {
    fn default() -> Self {
        Self { threads: 1 }
    }
}

impl ThreadingOptions {
    /// Creates threading options with `threads` threads.
    #[must_use]
    pub fn new(threads: usize) -> Self {
        Self { threads }
    }

    /// Validates that at least one thread is requested.
    ///
    /// # Errors
    ///
    /// Returns an error if `threads` is zero.
    pub fn validate(&self) -> anyhow::Result<()> {
        validate_positive(self.threads, "threads")?;
        Ok(())
    }

    /// Builds a rayon pool with the requested number of threads.
    ///
    /// # Errors
    ///
    /// Returns an error if the pool cannot be created.
    pub fn build_pool(&self) -> anyhow::Result<rayon::ThreadPool> {
        rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build thread pool: {e}"))
    }

    /// Returns a log message describing the threading configuration.
    #[must_use]
    pub fn log_message(&self) -> String {
        if self.threads == 1 { "Using 1 thread".to_string() } else { format!("Using {} threads", self.threads) }
    }
}
