//! File discovery for observation sources
//!
//! Resolves a source location to a local directory and lists the files in it
//! that carry the configured extension.

use crate::constants::FILE_URI_SCHEME;
use crate::error::{ProcessorError, Result};
use glob::Pattern;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resolve a source location string to a local directory.
///
/// Accepts a plain path or a `file://` URI. Other schemes need a dedicated
/// `TabularSource` and are rejected here.
pub fn resolve_local_location(location: &str) -> Result<PathBuf> {
    if let Some(path) = location.strip_prefix(FILE_URI_SCHEME) {
        return Ok(PathBuf::from(path));
    }

    if let Some((scheme, _)) = location.split_once("://") {
        return Err(ProcessorError::Configuration {
            message: format!(
                "unsupported location scheme '{}://' in '{}': only local paths and file:// URIs can be read",
                scheme, location
            ),
        });
    }

    Ok(PathBuf::from(location))
}

/// File discovery component for observation directories
#[derive(Debug)]
pub struct FileDiscovery {
    directory: PathBuf,
    extension: String,
}

impl FileDiscovery {
    /// Create a discovery for `directory`, matching `extension` (no leading dot)
    pub fn new(directory: PathBuf, extension: impl Into<String>) -> Self {
        Self {
            directory,
            extension: extension.into(),
        }
    }

    /// List matching files directly inside the directory, sorted by path.
    ///
    /// Sub-directories are not searched. Zero matches is an error.
    pub fn discover_files(&self) -> Result<Vec<PathBuf>> {
        if !self.directory.is_dir() {
            return Err(self.not_found());
        }

        let pattern = format!(
            "{}/*.{}",
            Pattern::escape(&self.directory.to_string_lossy()),
            Pattern::escape(&self.extension)
        );
        debug!("Searching for source files with pattern: {}", pattern);

        let entries = glob::glob(&pattern).map_err(|e| ProcessorError::Configuration {
            message: format!("invalid source pattern '{}': {}", pattern, e),
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| ProcessorError::Io(e.into()))?;
            if path.is_file() && has_extension(&path, &self.extension) {
                files.push(path);
            }
        }
        files.sort();

        if files.is_empty() {
            return Err(self.not_found());
        }

        debug!(
            "Found {} '.{}' files in {}",
            files.len(),
            self.extension,
            self.directory.display()
        );
        Ok(files)
    }

    fn not_found(&self) -> ProcessorError {
        ProcessorError::SourceNotFound {
            location: self.directory.display().to_string(),
            extension: self.extension.clone(),
        }
    }
}

/// Check the extension exactly (case-sensitive)
fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().is_some_and(|ext| ext == extension)
}
