//! Normalization of loaded rows into typed observations
//!
//! Checks that each batch declares the required columns, projects them in
//! a fixed order, and casts the screen temperature to `f64`.

use super::loader::{RowBatch, RowSet};
use crate::config::{ObservationColumns, ProcessorConfig};
use crate::error::{ProcessorError, Result};
use crate::models::Observation;

use polars::prelude::*;
use std::path::Path;
use tracing::debug;

/// Turns text row batches into `Observation`s
#[derive(Debug, Clone)]
pub struct Normalizer {
    columns: ObservationColumns,
    null_tokens: Vec<String>,
}

impl Normalizer {
    pub fn new(columns: ObservationColumns, null_tokens: Vec<String>) -> Self {
        Self {
            columns,
            null_tokens,
        }
    }

    pub fn from_config(config: &ProcessorConfig) -> Self {
        Self::new(config.columns.clone(), config.null_tokens.clone())
    }

    /// Normalize every batch, then concatenate the results once
    pub fn normalize(&self, rows: &RowSet) -> Result<Vec<Observation>> {
        let per_batch = rows
            .batches()
            .iter()
            .map(|batch| self.normalize_batch(batch))
            .collect::<Result<Vec<_>>>()?;

        let observations = per_batch.concat();
        debug!(
            "Normalized {} observations from {} files",
            observations.len(),
            rows.file_count()
        );
        Ok(observations)
    }

    /// Normalize one file's rows. Extra columns are dropped.
    pub fn normalize_batch(&self, batch: &RowBatch) -> Result<Vec<Observation>> {
        let header = batch.header();
        let required = self.columns.in_order();
        if let Some(missing) = required
            .iter()
            .find(|column| !header.iter().any(|name| name == *column))
        {
            return Err(ProcessorError::missing_column(&batch.path, missing));
        }

        let projected = batch.frame.select(required)?;
        let columns = &self.columns;

        let observation_time = text_column(&projected, &columns.observation_time)?;
        let observation_date = text_column(&projected, &columns.observation_date)?;
        let screen_temperature = text_column(&projected, &columns.screen_temperature)?;
        let weather_code = text_column(&projected, &columns.weather_code)?;
        let site_name = text_column(&projected, &columns.site_name)?;
        let region = text_column(&projected, &columns.region)?;
        let country = text_column(&projected, &columns.country)?;

        let mut observations = Vec::with_capacity(projected.height());
        for row in 0..projected.height() {
            observations.push(Observation {
                observation_time: observation_time[row].clone(),
                observation_date: observation_date[row].clone(),
                screen_temperature: self.parse_measure(
                    screen_temperature[row].as_deref(),
                    &batch.path,
                    row + 1,
                )?,
                weather_code: weather_code[row].clone(),
                site_name: site_name[row].clone(),
                region: region[row].clone(),
                country: country[row].clone(),
            });
        }

        Ok(observations)
    }

    /// Cast one measure cell; `row` counts data rows from 1
    fn parse_measure(&self, raw: Option<&str>, path: &Path, row: usize) -> Result<Option<f64>> {
        let Some(raw) = raw else {
            return Ok(None);
        };

        let value = raw.trim();
        if self.null_tokens.iter().any(|token| token == value) {
            return Ok(None);
        }

        // NaN passes through and is dropped by the aggregator with the
        // sentinel; infinities are not temperatures.
        value
            .parse::<f64>()
            .ok()
            .filter(|v| !v.is_infinite())
            .map(Some)
            .ok_or_else(|| ProcessorError::TypeConversion {
                path: path.to_path_buf(),
                column: self.columns.screen_temperature.clone(),
                row,
                value: raw.to_string(),
            })
    }
}

/// Read a column as owned text values, nulls preserved
fn text_column(frame: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let series = frame
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::String)?;

    Ok(series
        .str()?
        .into_iter()
        .map(|value| value.map(str::to_string))
        .collect())
}
