//! Command-line interface components.

use crate::config::{CompressionAlgorithm, ObservationColumns, ProcessorConfig};
use crate::constants::{
    DEFAULT_FILE_EXTENSION, DEFAULT_JOB_NAME, DEFAULT_SENTINEL, LOG_TARGET,
};
use crate::error::Result;
use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;
use tracing::debug;

/// Header naming convention of the source files
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HeaderStyle {
    /// observation_time, screen_temperature, ...
    Snake,
    /// ObservationTime, ScreenTemperature, ...
    Pascal,
}

impl HeaderStyle {
    pub fn columns(self) -> ObservationColumns {
        match self {
            HeaderStyle::Snake => ObservationColumns::default(),
            HeaderStyle::Pascal => ObservationColumns::pascal_case(),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "screen_temp_processor")]
#[command(about = "Roll hourly weather observation CSV files up to daily maximum screen temperatures")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Directory (or file:// URI) holding the observation files
    #[arg(value_name = "SOURCE")]
    pub source: String,

    /// Parquet file for the daily maxima
    #[arg(short, long)]
    pub output_path: Option<PathBuf>,

    /// Also write the hottest-day rows to this Parquet file
    #[arg(long, value_name = "PATH")]
    pub hottest_output: Option<PathBuf>,

    /// Job name reported in logs and the summary
    #[arg(long, default_value = DEFAULT_JOB_NAME)]
    pub job_name: String,

    /// Extension of the files to read
    #[arg(long, default_value = DEFAULT_FILE_EXTENSION)]
    pub extension: String,

    /// Screen temperature value that marks a missing reading
    #[arg(long, default_value_t = DEFAULT_SENTINEL, allow_hyphen_values = true)]
    pub sentinel: f64,

    /// Header naming convention of the source files
    #[arg(long, value_enum, default_value = "snake")]
    pub header_style: HeaderStyle,

    /// Parquet compression algorithm (snappy, gzip, zstd, lz4, none)
    #[arg(long, default_value = "snappy")]
    pub compression: String,

    /// Maximum files read concurrently (defaults to the number of CPUs)
    #[arg(short = 'j', long)]
    pub max_concurrent_files: Option<usize>,

    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors and hide progress output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    pub fn show_progress(&self) -> bool {
        !self.quiet
    }

    /// Build the processing configuration from the arguments
    pub fn to_config(&self) -> Result<ProcessorConfig> {
        let compression: CompressionAlgorithm = self.compression.parse()?;

        let mut config = ProcessorConfig::default()
            .with_job_name(self.job_name.clone())
            .with_file_extension(self.extension.clone())
            .with_sentinel(self.sentinel)
            .with_columns(self.header_style.columns())
            .with_compression(compression);

        if let Some(max_files) = self.max_concurrent_files {
            config = config.with_max_concurrent_files(max_files);
        }
        if let Some(path) = &self.hottest_output {
            config = config.with_hottest_output(path.clone());
        }
        if !self.show_progress() {
            config = config.without_progress();
        }

        config.validate()?;
        Ok(config)
    }
}

/// Set up structured logging on stderr
pub fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{}={}", LOG_TARGET, log_level)));

    if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("Logging initialized at level: {}", log_level);
}
