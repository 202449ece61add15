//! Basic processing integration tests

use super::write_observations;
use crate::config::{CompressionAlgorithm, ObservationColumns, ProcessorConfig};
use crate::constants::output_columns;
use crate::pipeline::DailyMaxProcessor;
use polars::prelude::*;
use std::fs::{self, File};
use std::path::Path;
use tempfile::TempDir;

fn quiet_config() -> ProcessorConfig {
    ProcessorConfig::default().without_progress()
}

fn read_parquet(path: &Path) -> DataFrame {
    ParquetReader::new(File::open(path).unwrap()).finish().unwrap()
}

fn max_column(frame: &DataFrame) -> Vec<Option<f64>> {
    frame
        .column(output_columns::MAX_SCREEN_TEMPERATURE)
        .unwrap()
        .as_materialized_series()
        .f64()
        .unwrap()
        .into_iter()
        .collect()
}

/// Two files, two sites, one all-sentinel group
fn create_dataset(temp_dir: &TempDir) -> std::path::PathBuf {
    let input = temp_dir.path().join("input");
    write_observations(
        &input,
        "weather.20160201.csv",
        &[
            "0,2020-01-01,10.5,1,A,West,US",
            "1,2020-01-01,15.2,1,A,West,US",
            "2,2020-01-01,-99,1,A,West,US",
            "0,2020-01-01,-99,3,C,North,US",
        ],
    );
    write_observations(
        &input,
        "weather.20160301.csv",
        &[
            "0,2020-01-02,7.0,1,B,East,UK",
            "1,2020-01-02,9.75,1,B,East,UK",
            "2,2020-01-02,,1,B,East,UK",
        ],
    );
    input
}

#[tokio::test]
async fn test_basic_processing_pipeline() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_dataset(&temp_dir);
    let output = temp_dir.path().join("output").join("daily.parquet");

    let processor = DailyMaxProcessor::new(input.to_str().unwrap(), Some(output.clone()))
        .unwrap()
        .with_config(quiet_config().with_job_name("test-job"));

    let stats = processor.process().await.unwrap();

    assert_eq!(stats.job_name, "test-job");
    assert_eq!(stats.files_loaded, 2);
    assert_eq!(stats.rows_loaded, 7);
    assert_eq!(stats.rows_excluded, 3);
    assert_eq!(stats.groups_written, 2);
    assert_eq!(stats.output_path, output);
    assert!(output.exists());

    let frame = read_parquet(&output);
    let names: Vec<String> = frame
        .get_column_names()
        .iter()
        .map(|n| n.to_string())
        .collect();
    assert_eq!(names, output_columns::ALL);
    assert_eq!(frame.height(), 2);
    // Sorted by key: UK before US
    assert_eq!(max_column(&frame), vec![Some(9.75), Some(15.2)]);

    assert_eq!(stats.hottest.len(), 1);
    assert_eq!(stats.hottest[0].max_screen_temperature, 15.2);
    assert_eq!(stats.hottest[0].key.site_name.as_deref(), Some("A"));
}

#[tokio::test]
async fn test_default_output_path_is_inside_source() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_dataset(&temp_dir);

    let processor = DailyMaxProcessor::new(input.to_str().unwrap(), None)
        .unwrap()
        .with_config(quiet_config());
    let stats = processor.process().await.unwrap();

    assert_eq!(stats.output_path, input.join("daily_max_temperature.parquet"));
    assert!(stats.output_path.exists());

    // A rerun must not pick up the parquet file as input
    let rerun = processor.process().await.unwrap();
    assert_eq!(rerun.files_loaded, 2);
}

#[tokio::test]
async fn test_rerun_produces_identical_output() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_dataset(&temp_dir);
    let output = temp_dir.path().join("daily.parquet");

    let processor = DailyMaxProcessor::new(input.to_str().unwrap(), Some(output.clone()))
        .unwrap()
        .with_config(quiet_config());

    processor.process().await.unwrap();
    let first = read_parquet(&output);
    processor.process().await.unwrap();
    let second = read_parquet(&output);

    assert!(first.equals(&second));
}

#[tokio::test]
async fn test_hottest_ties_are_persisted() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("input");
    write_observations(
        &input,
        "obs.csv",
        &[
            "0,d1,20.0,1,A,West,US",
            "0,d2,20.0,1,B,East,UK",
            "0,d3,19.0,1,C,South,FR",
        ],
    );
    let output = temp_dir.path().join("daily.parquet");
    let hottest_output = temp_dir.path().join("hottest.parquet");

    let processor = DailyMaxProcessor::new(input.to_str().unwrap(), Some(output))
        .unwrap()
        .with_config(quiet_config().with_hottest_output(&hottest_output));
    let stats = processor.process().await.unwrap();

    assert_eq!(stats.hottest.len(), 2);
    assert_eq!(stats.hottest_output_path, Some(hottest_output.clone()));

    let hottest = read_parquet(&hottest_output);
    assert_eq!(hottest.height(), 2);
    assert_eq!(max_column(&hottest), vec![Some(20.0), Some(20.0)]);
}

#[tokio::test]
async fn test_pascal_case_source_with_extra_columns() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("input");
    fs::create_dir_all(&input).unwrap();
    fs::write(
        input.join("weather.20160201.csv"),
        "ForecastSiteCode,ObservationTime,ObservationDate,WindDirection,WindSpeed,WindGust,Visibility,ScreenTemperature,Pressure,SignificantWeatherCode,SiteName,Latitude,Longitude,Region,Country\n\
         3002,0,2016-02-01T00:00:00,12,8,,30000,2.1,997,8,BALTASOUND (3002),60.749,-0.854,Orkney & Shetland,SCOTLAND\n\
         3002,1,2016-02-01T00:00:00,13,10,,35000,0.1,997,7,BALTASOUND (3002),60.749,-0.854,Orkney & Shetland,SCOTLAND\n\
         3005,0,2016-02-01T00:00:00,10,2,,50000,-99,998,-99,LERWICK (S. SCREEN) (3005),60.139,-1.183,Orkney & Shetland,SCOTLAND\n",
    )
    .unwrap();
    let output = temp_dir.path().join("daily.parquet");

    let config = quiet_config()
        .with_columns(ObservationColumns::pascal_case())
        .with_compression(CompressionAlgorithm::Gzip);
    let processor = DailyMaxProcessor::new(input.to_str().unwrap(), Some(output.clone()))
        .unwrap()
        .with_config(config);
    let stats = processor.process().await.unwrap();

    assert_eq!(stats.groups_written, 1);
    assert_eq!(stats.rows_excluded, 1);
    let frame = read_parquet(&output);
    assert_eq!(max_column(&frame), vec![Some(2.1)]);
    assert_eq!(frame.width(), 5);
}

#[tokio::test]
async fn test_file_uri_source() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_dataset(&temp_dir);
    let output = temp_dir.path().join("daily.parquet");

    let location = format!("file://{}", input.display());
    let processor = DailyMaxProcessor::new(location, Some(output.clone()))
        .unwrap()
        .with_config(quiet_config().with_max_concurrent_files(1));
    let stats = processor.process().await.unwrap();

    assert_eq!(stats.files_loaded, 2);
    assert!(output.exists());
}
