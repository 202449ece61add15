//! Error handling for daily maximum processing.
//!
//! Every stage fails fast with one of these variants; each carries the file,
//! column or destination needed to diagnose the failure.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("No '.{extension}' files found at source: {location}")]
    SourceNotFound { location: String, extension: String },

    #[error("Failed to parse file: {path} - {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("Schema error in file {path}: {reason}")]
    Schema { path: PathBuf, reason: String },

    #[error(
        "Type conversion failed in file {path}, column '{column}', row {row}: '{value}' is not numeric"
    )]
    TypeConversion {
        path: PathBuf,
        column: String,
        row: usize,
        value: String,
    },

    #[error("Empty result: {reason}")]
    EmptyResult { reason: String },

    #[error("Failed to write {path}: {reason}")]
    Write { path: PathBuf, reason: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Processing failed for file: {path} - {reason}")]
    ProcessingFailed { path: PathBuf, reason: String },
}

impl ProcessorError {
    /// Schema error for a required column that the file does not declare
    pub fn missing_column(path: impl Into<PathBuf>, column: &str) -> Self {
        Self::Schema {
            path: path.into(),
            reason: format!("missing required column '{}'", column),
        }
    }

    pub fn write(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        Self::Write {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn empty_result(reason: impl Into<String>) -> Self {
        Self::EmptyResult {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ProcessorError>;
