//! Output writers for profiles.
//!
//! This module handles writing data to disk in various formats:
//! - pprof profiles (gzip-compressed protobuf)
//! - JSON profile dumps
//! - Text summaries for the terminal

pub mod json;
pub mod pprof;
pub mod summary;

use crate::utils::error::OutputError;
use log::debug;
use std::path::Path;

// Re-export main functions
pub use json::{profile_to_string, read_profile_json, write_profile_json};
pub use pprof::{read_pprof, write_pprof};
pub use summary::{generate_text_summary, hottest_stacks, StackSummary};

/// Validate that the output path is writable and create its parent directories
///
/// **Private** - shared by the writers
fn prepare_output_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    Ok(())
}

/// Size of a written file in bytes, 0 if unknown
fn file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}
