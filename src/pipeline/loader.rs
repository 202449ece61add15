//! Loading observation files into row batches
//!
//! Reads every matching file of a source location on the blocking pool with
//! bounded, order-preserving concurrency. Each file becomes one immutable
//! `RowBatch`; the batches are gathered once into a `RowSet`.

use super::discovery::{FileDiscovery, resolve_local_location};
use crate::config::ProcessorConfig;
use crate::error::{ProcessorError, Result};

use futures::stream::{self, StreamExt, TryStreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use polars::prelude::*;
use std::future::Future;
use std::path::{Path, PathBuf};
use tokio::task;
use tracing::{debug, info};

/// Capability to read tabular rows from a location
pub trait TabularSource {
    /// Load every row at `location`.
    ///
    /// Fails if nothing matches, a file cannot be parsed, headers differ
    /// between files, or no rows are found.
    fn load(&self, location: &str) -> impl Future<Output = Result<RowSet>> + Send;
}

/// Rows read from a single file, all columns as text
#[derive(Debug, Clone)]
pub struct RowBatch {
    pub path: PathBuf,
    pub frame: DataFrame,
}

impl RowBatch {
    /// Column names in header order
    pub fn header(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect()
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }
}

/// Union of the batches of every source file
#[derive(Debug, Clone)]
pub struct RowSet {
    batches: Vec<RowBatch>,
}

impl RowSet {
    /// Gather batches, requiring every file to declare the first file's header
    pub fn from_batches(batches: Vec<RowBatch>) -> Result<Self> {
        if let Some((first, rest)) = batches.split_first() {
            let expected = first.header();
            for batch in rest {
                let found = batch.header();
                if found != expected {
                    return Err(ProcessorError::Schema {
                        path: batch.path.clone(),
                        reason: format!(
                            "header [{}] does not match [{}] declared by {}",
                            found.join(","),
                            expected.join(","),
                            first.path.display()
                        ),
                    });
                }
            }
        }

        Ok(Self { batches })
    }

    pub fn batches(&self) -> &[RowBatch] {
        &self.batches
    }

    pub fn into_batches(self) -> Vec<RowBatch> {
        self.batches
    }

    pub fn file_count(&self) -> usize {
        self.batches.len()
    }

    /// Total rows across all batches
    pub fn height(&self) -> usize {
        self.batches.iter().map(RowBatch::height).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.height() == 0
    }
}

/// Reads delimited files with a header line from a local directory
#[derive(Debug, Clone)]
pub struct CsvDirectorySource {
    extension: String,
    max_concurrent_files: usize,
    show_progress: bool,
}

impl CsvDirectorySource {
    pub fn new(extension: impl Into<String>, max_concurrent_files: usize) -> Self {
        Self {
            extension: extension.into(),
            max_concurrent_files: max_concurrent_files.max(1),
            show_progress: false,
        }
    }

    pub fn from_config(config: &ProcessorConfig) -> Self {
        Self {
            extension: config.extension().to_string(),
            max_concurrent_files: config.max_concurrent_files.max(1),
            show_progress: config.show_progress,
        }
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(len as u64);
        if let Ok(style) = ProgressStyle::default_bar().template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}",
        ) {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb.set_message("Loading files");
        pb
    }
}

impl TabularSource for CsvDirectorySource {
    async fn load(&self, location: &str) -> Result<RowSet> {
        let directory = resolve_local_location(location)?;
        let files = FileDiscovery::new(directory, self.extension.clone()).discover_files()?;

        let concurrent_limit = self.max_concurrent_files.min(files.len()).max(1);
        debug!(
            "Loading {} files with concurrency {}",
            files.len(),
            concurrent_limit
        );

        let pb = self.progress_bar(files.len());
        let batches: Vec<RowBatch> = stream::iter(files)
            .map(|path| {
                let pb = pb.clone();
                async move {
                    if let Some(file_name) = path.file_name() {
                        pb.set_message(format!("Loading: {}", file_name.to_string_lossy()));
                    }
                    let result = read_file(path).await;
                    pb.inc(1);
                    result
                }
            })
            .buffered(concurrent_limit)
            .try_collect()
            .await?;
        pb.finish_with_message("All files loaded");

        let rows = RowSet::from_batches(batches)?;
        info!(
            "Record count for data processing: {} rows from {} files",
            rows.height(),
            rows.file_count()
        );

        if rows.is_empty() {
            return Err(ProcessorError::empty_result(format!(
                "no records in {} file(s) at {}",
                rows.file_count(),
                location
            )));
        }

        Ok(rows)
    }
}

/// Read one file on the blocking pool
async fn read_file(path: PathBuf) -> Result<RowBatch> {
    let task_path = path.clone();
    task::spawn_blocking(move || read_csv_batch(&task_path))
        .await
        .map_err(|e| ProcessorError::ProcessingFailed {
            path,
            reason: format!("file read task failed: {}", e),
        })?
}

/// Parse a file with its header line, keeping every column as text
pub fn read_csv_batch(path: &Path) -> Result<RowBatch> {
    if std::fs::metadata(path)?.len() == 0 {
        return Err(ProcessorError::Parse {
            path: path.to_path_buf(),
            reason: "file is empty, expected a header line".to_string(),
        });
    }

    check_field_counts(path)?;

    let frame = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .and_then(|reader| reader.finish())
        .map_err(|e| ProcessorError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    debug!("Read {} rows from {}", frame.height(), path.display());

    Ok(RowBatch {
        path: path.to_path_buf(),
        frame,
    })
}

/// Reject rows whose field count differs from the header.
///
/// The polars reader pads short rows with nulls, so ragged files are caught
/// here before they reach it.
fn check_field_counts(path: &Path) -> Result<()> {
    let parse_error = |e: csv::Error| ProcessorError::Parse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_path(path)
        .map_err(parse_error)?;

    let mut record = csv::ByteRecord::new();
    while reader.read_byte_record(&mut record).map_err(parse_error)? {}

    Ok(())
}
