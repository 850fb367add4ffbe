use crate::output::read_pprof;
use crate::utils::config::{PERIOD_TYPE, SAMPLE_TYPES};
use anyhow::Result;
use std::path::Path;

/// Validate a pprof profile file
pub fn validate_profile_file(file_path: &Path) -> Result<()> {
    println!("Validating profile: {}", file_path.display());

    let profile = read_pprof(file_path)?;

    println!("✓ Valid pprof profile");
    println!(
        "  Period:       {} {}/{}",
        profile.period, profile.period_type.r#type, profile.period_type.unit
    );
    for (idx, st) in profile.sample_type.iter().enumerate() {
        println!("  Sample type {}: {}/{} (total {})", idx, st.r#type, st.unit, profile.total(idx));
    }
    println!("  Functions:    {}", profile.function.len());
    println!("  Locations:    {}", profile.location.len());
    println!("  Samples:      {}", profile.sample.len());

    Ok(())
}

/// Display version information
pub fn display_version() {
    println!("Trace pprof v{}", env!("CARGO_PKG_VERSION"));
    println!(
        "Profile layout: period {}/{}, samples [{}]",
        PERIOD_TYPE.0,
        PERIOD_TYPE.1,
        SAMPLE_TYPES
            .iter()
            .map(|(ty, unit)| format!("{}/{}", ty, unit))
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!();
    println!("Builds pprof profiles (io, block, syscall, sched) from runtime execution traces.");
}
