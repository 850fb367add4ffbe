//! JSON profile dump.
//!
//! A readable rendition of the same profile, for inspection and diffing.

use crate::pprof::Profile;
use crate::utils::error::OutputError;
use log::{debug, info};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Write a profile as pretty-printed JSON
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - path cannot be created or is invalid
pub fn write_profile_json(profile: &Profile, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing JSON profile to: {}", output_path.display());

    super::prepare_output_path(output_path)?;

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, profile).map_err(OutputError::SerializationFailed)?;

    info!(
        "JSON profile written successfully ({} bytes)",
        super::file_size(output_path)
    );

    Ok(())
}

/// Serialize a profile to a JSON string
pub fn profile_to_string(profile: &Profile) -> Result<String, OutputError> {
    serde_json::to_string_pretty(profile).map_err(OutputError::SerializationFailed)
}

/// Read a profile previously written with [`write_profile_json`]
pub fn read_profile_json(input_path: impl AsRef<Path>) -> Result<Profile, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading JSON profile from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::WriteFailed)?;
    let profile: Profile = serde_json::from_reader(file).map_err(OutputError::SerializationFailed)?;

    Ok(profile)
}
