//! Daily maximum aggregation
//!
//! Grouped maximum with a filter: rows whose screen temperature is missing,
//! NaN, or equal to the sentinel are dropped *before* grouping, so a group
//! made only of such rows never appears in the output.

use crate::models::{DailyMaximum, GroupKey, Observation};
use std::collections::HashMap;
use tracing::debug;

/// Result of one aggregation pass
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    /// One row per non-empty group, sorted by key
    pub rows: Vec<DailyMaximum>,
    /// Rows dropped by the filter
    pub excluded: usize,
}

/// True if the measure takes part in the maximum.
///
/// NaN is treated as missing: it would otherwise win or lose comparisons
/// depending on argument order.
pub fn is_valid_measure(value: Option<f64>, sentinel: f64) -> bool {
    match value {
        Some(v) => !v.is_nan() && v != sentinel,
        None => false,
    }
}

/// Compute the maximum screen temperature per (country, region, site, date)
pub fn aggregate_daily_max(observations: &[Observation], sentinel: f64) -> Aggregation {
    let mut groups: HashMap<GroupKey, f64> = HashMap::new();
    let mut excluded = 0usize;

    for observation in observations {
        let value = match observation.screen_temperature {
            Some(v) if is_valid_measure(Some(v), sentinel) => v,
            _ => {
                excluded += 1;
                continue;
            }
        };

        groups
            .entry(observation.group_key())
            .and_modify(|max| *max = max.max(value))
            .or_insert(value);
    }

    let mut rows: Vec<DailyMaximum> = groups
        .into_iter()
        .map(|(key, max_screen_temperature)| DailyMaximum {
            key,
            max_screen_temperature,
        })
        .collect();
    rows.sort_by(|a, b| a.key.cmp(&b.key));

    debug!(
        "Aggregated {} observations into {} daily maxima ({} excluded)",
        observations.len(),
        rows.len(),
        excluded
    );

    Aggregation { rows, excluded }
}
