//! Application constants for the screen temperature processor
//!
//! Default values and fixed column names used across the pipeline.

// =============================================================================
// Source Defaults
// =============================================================================

/// Extension (without the dot) of observation files picked up from a source
pub const DEFAULT_FILE_EXTENSION: &str = "csv";

/// Screen temperature value the observation feed uses for "unknown"
pub const DEFAULT_SENTINEL: f64 = -99.0;

/// Cell values treated as null when casting the measure column
pub const DEFAULT_NULL_TOKENS: &[&str] = &["", "NA", "N/A", "null", "NULL"];

/// URI scheme accepted for local source locations
pub const FILE_URI_SCHEME: &str = "file://";

// =============================================================================
// Output Defaults
// =============================================================================

/// Job name used in logs and stats when none is configured
pub const DEFAULT_JOB_NAME: &str = "daily-max-temperature";

/// File name of the aggregated output when no destination is given
pub const DEFAULT_OUTPUT_FILE_NAME: &str = "daily_max_temperature.parquet";

/// Output column names, in the order they are written
pub mod output_columns {
    pub const COUNTRY: &str = "country";
    pub const REGION: &str = "region";
    pub const SITE_NAME: &str = "site_name";
    pub const OBSERVATION_DATE: &str = "observation_date";
    pub const MAX_SCREEN_TEMPERATURE: &str = "max_screen_temperature";

    pub const ALL: [&str; 5] = [
        COUNTRY,
        REGION,
        SITE_NAME,
        OBSERVATION_DATE,
        MAX_SCREEN_TEMPERATURE,
    ];
}

// =============================================================================
// Logging
// =============================================================================

/// Tracing target used for the default EnvFilter directive
pub const LOG_TARGET: &str = "screen_temp_processor";
