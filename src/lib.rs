//! Screen Temperature Processor Library
//!
//! Rolls hourly weather observation CSV files up to the daily maximum screen
//! temperature per country, region, site and date, reports the hottest day,
//! and writes the aggregate as Apache Parquet.
//!
//! The pipeline runs in five stages:
//! - Load every matching file of a source directory into row batches
//! - Normalize the batches into typed observations
//! - Aggregate daily maxima, dropping missing and sentinel readings first
//! - Derive the hottest day (all ties kept)
//! - Write the aggregate, replacing any previous output

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod pipeline;

// Re-export commonly used types
pub use config::{CompressionAlgorithm, ObservationColumns, ProcessorConfig};
pub use error::{ProcessorError, Result};
pub use models::{DailyMaximum, GroupKey, HottestDay, Observation, ProcessingStats};
pub use pipeline::DailyMaxProcessor;
