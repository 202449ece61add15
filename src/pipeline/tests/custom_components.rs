//! Processor behavior over in-memory sources and sinks

use crate::config::ProcessorConfig;
use crate::constants::output_columns;
use crate::error::{ProcessorError, Result};
use crate::pipeline::{DailyMaxProcessor, RowBatch, RowSet, TabularSink, TabularSource};
use polars::df;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

struct MemorySource {
    batches: Vec<RowBatch>,
}

impl TabularSource for MemorySource {
    async fn load(&self, location: &str) -> Result<RowSet> {
        if self.batches.is_empty() {
            return Err(ProcessorError::SourceNotFound {
                location: location.to_string(),
                extension: "csv".to_string(),
            });
        }
        RowSet::from_batches(self.batches.clone())
    }
}

#[derive(Default)]
struct RecordingSink {
    written: Mutex<Vec<(PathBuf, DataFrame)>>,
}

impl TabularSink for RecordingSink {
    async fn write(&self, frame: DataFrame, destination: &Path) -> Result<usize> {
        let height = frame.height();
        let mut written = self.written.lock().unwrap();
        written.retain(|(path, _)| path != destination);
        written.push((destination.to_path_buf(), frame));
        Ok(height)
    }
}

fn batch(name: &str, temperatures: &[&str], sites: &[&str]) -> RowBatch {
    let n = temperatures.len();
    let frame = df!(
        "observation_time" => vec!["0"; n],
        "observation_date" => vec!["2020-01-01"; n],
        "screen_temperature" => temperatures.to_vec(),
        "weather_code" => vec!["1"; n],
        "site_name" => sites.to_vec(),
        "region" => vec!["West"; n],
        "country" => vec!["US"; n],
    )
    .unwrap();

    RowBatch {
        path: PathBuf::from(name),
        frame,
    }
}

fn config() -> ProcessorConfig {
    ProcessorConfig::default().without_progress()
}

#[tokio::test]
async fn test_process_through_custom_components() {
    let source = MemorySource {
        batches: vec![
            batch("a.csv", &["10.5", "-99", "12.0"], &["A", "A", "B"]),
            batch("b.csv", &["14.0", "-99"], &["A", "C"]),
        ],
    };
    let processor = DailyMaxProcessor::with_components(
        "memory://observations",
        PathBuf::from("daily.parquet"),
        config().with_hottest_output("hottest.parquet"),
        source,
        RecordingSink::default(),
    );

    let stats = processor.process().await.unwrap();

    assert_eq!(stats.files_loaded, 2);
    assert_eq!(stats.rows_loaded, 5);
    assert_eq!(stats.rows_excluded, 2);
    assert_eq!(stats.groups_written, 2);
    assert_eq!(stats.hottest.len(), 1);
    assert_eq!(stats.hottest[0].max_screen_temperature, 14.0);

    let written = processor.sink.written.lock().unwrap();
    assert_eq!(written.len(), 2);
    assert_eq!(written[0].0, PathBuf::from("daily.parquet"));
    assert_eq!(written[1].0, PathBuf::from("hottest.parquet"));

    let daily = &written[0].1;
    let sites: Vec<Option<&str>> = daily
        .column(output_columns::SITE_NAME)
        .unwrap()
        .as_materialized_series()
        .str()
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(sites, vec![Some("A"), Some("B")]);
}

#[tokio::test]
async fn test_source_failure_skips_writing() {
    let processor = DailyMaxProcessor::with_components(
        "memory://nothing",
        PathBuf::from("daily.parquet"),
        config(),
        MemorySource { batches: vec![] },
        RecordingSink::default(),
    );

    let result = processor.process().await;

    assert!(matches!(
        result,
        Err(ProcessorError::SourceNotFound { .. })
    ));
    assert!(processor.sink.written.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_repeated_runs_write_identical_frames() {
    let processor = DailyMaxProcessor::with_components(
        "memory://observations",
        PathBuf::from("daily.parquet"),
        config(),
        MemorySource {
            batches: vec![batch("a.csv", &["3.5", "4.25", "1.0"], &["B", "A", "B"])],
        },
        RecordingSink::default(),
    );

    processor.process().await.unwrap();
    let first = processor.sink.written.lock().unwrap()[0].1.clone();
    processor.process().await.unwrap();
    let written = processor.sink.written.lock().unwrap();

    assert_eq!(written.len(), 1);
    assert!(first.equals(&written[0].1));
}
