//! Core data structures for daily maximum processing.
//!
//! Defines the observation row, the aggregation key, the aggregated and
//! hottest-day rows, and run statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One normalized observation row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub observation_time: Option<String>,
    pub observation_date: Option<String>,
    /// `None` when the source cell was null
    pub screen_temperature: Option<f64>,
    pub weather_code: Option<String>,
    pub site_name: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
}

impl Observation {
    /// Aggregation key of this row
    pub fn group_key(&self) -> GroupKey {
        GroupKey {
            country: self.country.clone(),
            region: self.region.clone(),
            site_name: self.site_name.clone(),
            observation_date: self.observation_date.clone(),
        }
    }
}

/// Aggregation granularity: one site on one day.
///
/// Field order drives the derived ordering, so output is sorted by
/// country, region, site and then date.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupKey {
    pub country: Option<String>,
    pub region: Option<String>,
    pub site_name: Option<String>,
    pub observation_date: Option<String>,
}

/// Daily maximum screen temperature for one group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyMaximum {
    pub key: GroupKey,
    pub max_screen_temperature: f64,
}

/// Aggregated row that holds the overall maximum temperature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HottestDay {
    pub key: GroupKey,
    pub max_screen_temperature: f64,
}

impl From<&DailyMaximum> for HottestDay {
    fn from(row: &DailyMaximum) -> Self {
        Self {
            key: row.key.clone(),
            max_screen_temperature: row.max_screen_temperature,
        }
    }
}

/// Processing statistics
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingStats {
    pub job_name: String,
    pub started_at: DateTime<Utc>,
    pub files_loaded: usize,
    pub rows_loaded: usize,
    pub rows_excluded: usize,
    pub groups_written: usize,
    pub hottest: Vec<HottestDay>,
    pub output_path: PathBuf,
    pub hottest_output_path: Option<PathBuf>,
    pub processing_time_ms: u128,
}
