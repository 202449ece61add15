//! Daily maximum processing pipeline.
//!
//! Orchestrates the run: load source files, normalize them into typed
//! observations, aggregate daily maxima, derive the hottest day, and write
//! Parquet output. Engines are reached only through `TabularSource` and
//! `TabularSink`.

pub mod aggregator;
pub mod discovery;
pub mod loader;
pub mod normalizer;
pub mod reporter;
pub mod writer;

#[cfg(test)]
pub mod tests;

pub use self::aggregator::{Aggregation, aggregate_daily_max};
pub use self::loader::{CsvDirectorySource, RowBatch, RowSet, TabularSource};
pub use self::normalizer::Normalizer;
pub use self::reporter::hottest_days;
pub use self::writer::{ParquetSink, TabularSink, daily_max_frame, hottest_frame};

use self::discovery::resolve_local_location;
use self::reporter::{log_hottest_days, print_hottest_days};

use crate::config::ProcessorConfig;
use crate::constants::DEFAULT_OUTPUT_FILE_NAME;
use crate::error::{ProcessorError, Result};
use crate::models::ProcessingStats;

use chrono::Utc;
use colored::*;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{error, info};

/// Main processor for daily maximum screen temperatures
#[derive(Debug)]
pub struct DailyMaxProcessor<S = CsvDirectorySource, K = ParquetSink> {
    source_location: String,
    output_path: PathBuf,
    config: ProcessorConfig,
    source: S,
    sink: K,
}

impl DailyMaxProcessor {
    /// Create a processor reading CSV files and writing Parquet.
    ///
    /// Without an explicit output path the result is written next to the
    /// input files as `daily_max_temperature.parquet`.
    pub fn new(source_location: impl Into<String>, output_path: Option<PathBuf>) -> Result<Self> {
        let source_location = source_location.into();
        let output_path = match output_path {
            Some(path) => path,
            None => resolve_local_location(&source_location)?.join(DEFAULT_OUTPUT_FILE_NAME),
        };

        let config = ProcessorConfig::default();
        Ok(Self {
            source: CsvDirectorySource::from_config(&config),
            sink: ParquetSink::from_config(&config),
            source_location,
            output_path,
            config,
        })
    }

    /// Configure the processor
    pub fn with_config(mut self, config: ProcessorConfig) -> Self {
        self.source = CsvDirectorySource::from_config(&config);
        self.sink = ParquetSink::from_config(&config);
        self.config = config;
        self
    }
}

impl<S, K> DailyMaxProcessor<S, K>
where
    S: TabularSource + Sync,
    K: TabularSink + Sync,
{
    /// Create a processor over any source and sink
    pub fn with_components(
        source_location: impl Into<String>,
        output_path: PathBuf,
        config: ProcessorConfig,
        source: S,
        sink: K,
    ) -> Self {
        Self {
            source_location: source_location.into(),
            output_path,
            config,
            source,
            sink,
        }
    }

    pub fn output_path(&self) -> &PathBuf {
        &self.output_path
    }

    /// Main processing entry point. Any stage failure aborts the run.
    pub async fn process(&self) -> Result<ProcessingStats> {
        let start_time = Instant::now();
        let started_at = Utc::now();

        self.config
            .validate()
            .inspect_err(|e| error!("Invalid configuration: {}", e))?;

        info!(
            "Starting job '{}': {} -> {}",
            self.config.job_name,
            self.source_location,
            self.output_path.display()
        );
        if self.config.show_progress {
            println!(
                "{}",
                format!("Starting job '{}'", self.config.job_name)
                    .bright_green()
                    .bold()
            );
            println!("  {} {}", "Source:".bright_cyan(), self.source_location);
            println!(
                "  {} {}",
                "Output:".bright_cyan(),
                self.output_path.display()
            );
        }

        // Step 1: Load every source file
        let rows = self
            .source
            .load(&self.source_location)
            .await
            .inspect_err(|e| error!("Error while loading {}: {}", self.source_location, e))?;

        // Step 2: Cast and project into observations
        let observations = Normalizer::from_config(&self.config)
            .normalize(&rows)
            .inspect_err(|e| error!("Error while normalizing input rows: {}", e))?;

        // Step 3: Daily maximum per site, sentinel rows filtered first
        let aggregation = aggregate_daily_max(&observations, self.config.sentinel);
        if aggregation.rows.is_empty() {
            let err = ProcessorError::empty_result(format!(
                "all {} observations were excluded as missing, NaN or sentinel ({})",
                observations.len(),
                self.config.sentinel
            ));
            error!("Error while aggregating: {}", err);
            return Err(err);
        }

        // Step 4: Hottest day, derived without touching the aggregate
        let hottest = hottest_days(&aggregation.rows);
        log_hottest_days(&hottest);

        // Step 5: Persist
        let groups_written = self
            .sink
            .write(daily_max_frame(&aggregation.rows)?, &self.output_path)
            .await
            .inspect_err(|e| error!("Error while writing output: {}", e))?;

        if let Some(hottest_path) = &self.config.hottest_output {
            self.sink
                .write(hottest_frame(&hottest)?, hottest_path)
                .await
                .inspect_err(|e| error!("Error while writing hottest-day output: {}", e))?;
        }

        info!(
            "Successfully processed {} files into {} daily maxima at {}",
            rows.file_count(),
            groups_written,
            self.output_path.display()
        );

        let stats = ProcessingStats {
            job_name: self.config.job_name.clone(),
            started_at,
            files_loaded: rows.file_count(),
            rows_loaded: observations.len(),
            rows_excluded: aggregation.excluded,
            groups_written,
            hottest,
            output_path: self.output_path.clone(),
            hottest_output_path: self.config.hottest_output.clone(),
            processing_time_ms: start_time.elapsed().as_millis(),
        };

        if self.config.show_progress {
            print_hottest_days(&stats.hottest);
            print_summary(&stats);
        }

        Ok(stats)
    }
}

fn print_summary(stats: &ProcessingStats) {
    println!("\n{}", "Processing Summary".bright_green().bold());
    println!(
        "  {} {}ms",
        "Time elapsed:".bright_cyan(),
        stats.processing_time_ms.to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Files loaded:".bright_cyan(),
        stats.files_loaded.to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Rows loaded:".bright_cyan(),
        stats.rows_loaded.to_string().bright_white()
    );
    if stats.rows_excluded > 0 {
        println!(
            "  {} {}",
            "Rows excluded:".bright_yellow(),
            stats.rows_excluded.to_string().bright_yellow()
        );
    }
    println!(
        "  {} {}",
        "Daily maxima written:".bright_cyan(),
        stats.groups_written.to_string().bright_white().bold()
    );
}
