//! Configuration management and validation.
//!
//! Provides the processing configuration: source filtering, the sentinel
//! that marks unknown temperatures, header names for the observation
//! columns, and Parquet output settings.

use crate::constants::{
    DEFAULT_FILE_EXTENSION, DEFAULT_JOB_NAME, DEFAULT_NULL_TOKENS, DEFAULT_SENTINEL,
};
use crate::error::{ProcessorError, Result};
use polars::prelude::ParquetCompression;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Supported compression algorithms for parquet files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompressionAlgorithm {
    /// Snappy compression - good balance of speed and compression
    Snappy,
    /// Gzip compression - widest reader support
    Gzip,
    /// ZSTD compression - better compression ratio, slower
    Zstd,
    /// LZ4 compression - fastest, lower compression ratio
    Lz4,
    /// No compression
    Uncompressed,
}

impl CompressionAlgorithm {
    /// Convert to polars ParquetCompression type
    pub fn to_polars_compression(&self) -> ParquetCompression {
        match self {
            CompressionAlgorithm::Snappy => ParquetCompression::Snappy,
            CompressionAlgorithm::Gzip => ParquetCompression::Gzip(None),
            CompressionAlgorithm::Zstd => ParquetCompression::Zstd(None),
            CompressionAlgorithm::Lz4 => ParquetCompression::Lz4Raw,
            CompressionAlgorithm::Uncompressed => ParquetCompression::Uncompressed,
        }
    }
}

impl FromStr for CompressionAlgorithm {
    type Err = ProcessorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "snappy" => Ok(Self::Snappy),
            "gzip" => Ok(Self::Gzip),
            "zstd" => Ok(Self::Zstd),
            "lz4" => Ok(Self::Lz4),
            "none" | "uncompressed" => Ok(Self::Uncompressed),
            other => Err(ProcessorError::Configuration {
                message: format!(
                    "unknown compression '{}' (expected snappy, gzip, zstd, lz4 or none)",
                    other
                ),
            }),
        }
    }
}

/// Header names of the seven observation columns in the source files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationColumns {
    pub observation_time: String,
    pub observation_date: String,
    pub screen_temperature: String,
    pub weather_code: String,
    pub site_name: String,
    pub region: String,
    pub country: String,
}

impl Default for ObservationColumns {
    fn default() -> Self {
        Self {
            observation_time: "observation_time".to_string(),
            observation_date: "observation_date".to_string(),
            screen_temperature: "screen_temperature".to_string(),
            weather_code: "weather_code".to_string(),
            site_name: "site_name".to_string(),
            region: "region".to_string(),
            country: "country".to_string(),
        }
    }
}

impl ObservationColumns {
    /// Header names used by the Met Office hourly observation export
    pub fn pascal_case() -> Self {
        Self {
            observation_time: "ObservationTime".to_string(),
            observation_date: "ObservationDate".to_string(),
            screen_temperature: "ScreenTemperature".to_string(),
            weather_code: "SignificantWeatherCode".to_string(),
            site_name: "SiteName".to_string(),
            region: "Region".to_string(),
            country: "Country".to_string(),
        }
    }

    /// Column names in projection order
    pub fn in_order(&self) -> [&str; 7] {
        [
            self.observation_time.as_str(),
            self.observation_date.as_str(),
            self.screen_temperature.as_str(),
            self.weather_code.as_str(),
            self.site_name.as_str(),
            self.region.as_str(),
            self.country.as_str(),
        ]
    }
}

/// Global configuration for a processing run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessorConfig {
    /// Job identity reported in logs and stats
    pub job_name: String,

    /// Extension (without dot) of files read from the source
    pub file_extension: String,

    /// Measure value meaning "unknown"; such rows never reach the aggregate
    pub sentinel: f64,

    /// Header names of the observation columns
    pub columns: ObservationColumns,

    /// Cell values read as null in the measure column
    pub null_tokens: Vec<String>,

    /// Maximum files read concurrently
    pub max_concurrent_files: usize,

    /// Parquet compression for written files
    pub compression: CompressionAlgorithm,

    /// Write column statistics
    pub enable_statistics: bool,

    /// Show progress bars and the colored summary on the terminal
    pub show_progress: bool,

    /// Also persist the hottest-day rows here
    pub hottest_output: Option<PathBuf>,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            job_name: DEFAULT_JOB_NAME.to_string(),
            file_extension: DEFAULT_FILE_EXTENSION.to_string(),
            sentinel: DEFAULT_SENTINEL,
            columns: ObservationColumns::default(),
            null_tokens: DEFAULT_NULL_TOKENS.iter().map(|t| t.to_string()).collect(),
            max_concurrent_files: num_cpus::get().max(1),
            compression: CompressionAlgorithm::Snappy,
            enable_statistics: true,
            show_progress: true,
            hottest_output: None,
        }
    }
}

impl ProcessorConfig {
    pub fn with_job_name(mut self, job_name: impl Into<String>) -> Self {
        self.job_name = job_name.into();
        self
    }

    pub fn with_file_extension(mut self, extension: impl Into<String>) -> Self {
        self.file_extension = extension.into();
        self
    }

    pub fn with_sentinel(mut self, sentinel: f64) -> Self {
        self.sentinel = sentinel;
        self
    }

    pub fn with_columns(mut self, columns: ObservationColumns) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_max_concurrent_files(mut self, max_files: usize) -> Self {
        self.max_concurrent_files = max_files;
        self
    }

    pub fn with_compression(mut self, compression: CompressionAlgorithm) -> Self {
        self.compression = compression;
        self
    }

    pub fn with_hottest_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.hottest_output = Some(path.into());
        self
    }

    /// Disable progress bars and terminal summaries (logging is unaffected)
    pub fn without_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }

    /// Reject settings the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.sentinel.is_nan() {
            return Err(ProcessorError::Configuration {
                message: "sentinel must be a number, not NaN".to_string(),
            });
        }

        let extension = self.file_extension.trim_start_matches('.');
        if extension.is_empty() {
            return Err(ProcessorError::Configuration {
                message: "file extension must not be empty".to_string(),
            });
        }

        if self.max_concurrent_files == 0 {
            return Err(ProcessorError::Configuration {
                message: "max_concurrent_files must be at least 1".to_string(),
            });
        }

        Ok(())
    }

    /// File extension without a leading dot
    pub fn extension(&self) -> &str {
        self.file_extension.trim_start_matches('.')
    }

    /// True if the cell should be read as null
    pub fn is_null_token(&self, value: &str) -> bool {
        self.null_tokens.iter().any(|token| token == value)
    }
}
