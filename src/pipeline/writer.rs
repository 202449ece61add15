//! Parquet output for aggregated rows
//!
//! Converts daily maxima (or hottest-day rows) to a fixed five-column frame
//! and writes it, replacing any file already at the destination.

use crate::config::{CompressionAlgorithm, ProcessorConfig};
use crate::constants::output_columns;
use crate::error::{ProcessorError, Result};
use crate::models::{DailyMaximum, GroupKey, HottestDay};

use polars::prelude::{DataFrame, ParquetWriter as PolarsParquetWriter, StatisticsOptions};
use std::fs::File;
use std::future::Future;
use std::path::{Path, PathBuf};
use tokio::task;
use tracing::debug;

/// Capability to persist a frame at a destination
pub trait TabularSink {
    /// Write `frame` to `destination`, overwriting it. Returns rows written.
    fn write(
        &self,
        frame: DataFrame,
        destination: &Path,
    ) -> impl Future<Output = Result<usize>> + Send;
}

/// Parquet sink with configurable compression
#[derive(Debug, Clone)]
pub struct ParquetSink {
    compression: CompressionAlgorithm,
    enable_statistics: bool,
}

impl Default for ParquetSink {
    fn default() -> Self {
        Self::new(CompressionAlgorithm::Snappy)
    }
}

impl ParquetSink {
    pub fn new(compression: CompressionAlgorithm) -> Self {
        Self {
            compression,
            enable_statistics: true,
        }
    }

    pub fn from_config(config: &ProcessorConfig) -> Self {
        Self {
            compression: config.compression,
            enable_statistics: config.enable_statistics,
        }
    }

    /// Write synchronously; used from the blocking pool
    pub fn write_blocking(&self, mut frame: DataFrame, destination: &Path) -> Result<usize> {
        if destination.is_dir() {
            return Err(ProcessorError::write(
                destination,
                "destination is a directory, expected a file path",
            ));
        }

        if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ProcessorError::write(destination, e))?;
        }

        let statistics = if self.enable_statistics {
            StatisticsOptions::full()
        } else {
            StatisticsOptions::empty()
        };

        let file = File::create(destination).map_err(|e| ProcessorError::write(destination, e))?;
        PolarsParquetWriter::new(file)
            .with_compression(self.compression.to_polars_compression())
            .with_statistics(statistics)
            .finish(&mut frame)
            .map_err(|e| ProcessorError::write(destination, e))?;

        debug!(
            "Wrote {} rows to {} ({:?})",
            frame.height(),
            destination.display(),
            self.compression
        );
        Ok(frame.height())
    }
}

impl TabularSink for ParquetSink {
    async fn write(&self, frame: DataFrame, destination: &Path) -> Result<usize> {
        let sink = self.clone();
        let path: PathBuf = destination.to_path_buf();
        let task_path = path.clone();

        task::spawn_blocking(move || sink.write_blocking(frame, &task_path))
            .await
            .map_err(|e| ProcessorError::write(&path, format!("write task failed: {}", e)))?
    }
}

/// Output frame for daily maxima: country, region, site_name,
/// observation_date, max_screen_temperature
pub fn daily_max_frame(rows: &[DailyMaximum]) -> Result<DataFrame> {
    keyed_frame(rows.iter().map(|row| (&row.key, row.max_screen_temperature)))
}

/// Output frame for hottest-day rows, same columns as `daily_max_frame`
pub fn hottest_frame(days: &[HottestDay]) -> Result<DataFrame> {
    keyed_frame(days.iter().map(|day| (&day.key, day.max_screen_temperature)))
}

fn keyed_frame<'a>(rows: impl ExactSizeIterator<Item = (&'a GroupKey, f64)>) -> Result<DataFrame> {
    let len = rows.len();
    let mut country = Vec::with_capacity(len);
    let mut region = Vec::with_capacity(len);
    let mut site_name = Vec::with_capacity(len);
    let mut observation_date = Vec::with_capacity(len);
    let mut max_screen_temperature = Vec::with_capacity(len);

    for (key, max) in rows {
        country.push(key.country.as_deref());
        region.push(key.region.as_deref());
        site_name.push(key.site_name.as_deref());
        observation_date.push(key.observation_date.as_deref());
        max_screen_temperature.push(max);
    }

    let frame = polars::df!(
        output_columns::COUNTRY => country,
        output_columns::REGION => region,
        output_columns::SITE_NAME => site_name,
        output_columns::OBSERVATION_DATE => observation_date,
        output_columns::MAX_SCREEN_TEMPERATURE => max_screen_temperature,
    )?;
    Ok(frame)
}
