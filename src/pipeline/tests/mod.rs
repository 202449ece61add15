//! Integration tests for the pipeline module
//!
//! Runs the complete processor over temporary observation directories.

pub mod basic_processing;
pub mod custom_components;

use std::fs;
use std::path::{Path, PathBuf};

pub const HEADER: &str =
    "observation_time,observation_date,screen_temperature,weather_code,site_name,region,country";

/// Write an observation file with the standard header
pub fn write_observations(dir: &Path, name: &str, rows: &[&str]) -> PathBuf {
    fs::create_dir_all(dir).unwrap();
    let mut body = String::from(HEADER);
    body.push('\n');
    for row in rows {
        body.push_str(row);
        body.push('\n');
    }
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    path
}
