//! pprof profile file writer.
//!
//! Writes encoded profiles to disk for `go tool pprof` and friends.

use crate::pprof::Profile;
use crate::utils::config::PROFILE_EXTENSION;
use crate::utils::error::OutputError;
use log::{debug, info};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write a profile in the gzip-compressed pprof wire format
///
/// **Public** - main entry point for profile output
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::EncodingFailed` - protobuf or gzip failure
/// * `OutputError::InvalidPath` - path is empty, a directory, or uncreatable
pub fn write_pprof(profile: &Profile, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing profile to: {}", output_path.display());

    super::prepare_output_path(output_path)?;

    if !output_path.to_string_lossy().ends_with(PROFILE_EXTENSION) {
        debug!(
            "Warning: profile path does not end in .{}: {}",
            PROFILE_EXTENSION,
            output_path.display()
        );
    }

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let mut writer = BufWriter::new(file);

    profile.write(&mut writer)?;
    writer.flush().map_err(OutputError::WriteFailed)?;

    info!(
        "Profile written successfully ({} samples, {} bytes)",
        profile.sample.len(),
        super::file_size(output_path)
    );

    Ok(())
}

/// Read and validate a pprof profile file
///
/// **Public** - used by the validate command and tests
///
/// # Errors
/// * `OutputError::WriteFailed` - file read error (reusing WriteFailed for I/O)
/// * `OutputError::EncodingFailed` - not a valid profile
pub fn read_pprof(input_path: impl AsRef<Path>) -> Result<Profile, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading profile from: {}", input_path.display());

    let bytes = std::fs::read(input_path).map_err(OutputError::WriteFailed)?;
    let profile = Profile::decode(&bytes)?;

    debug!(
        "Profile loaded: {} samples, {} locations",
        profile.sample.len(),
        profile.location.len()
    );

    Ok(profile)
}
