//! Profile command implementation.
//!
//! The profile command:
//! 1. Reads trace events from a JSON trace
//! 2. Aggregates the events the analysis cares about, per stack
//! 3. Builds and timestamps the profile
//! 4. Writes the pprof profile (and optionally a JSON dump)
//! 5. Prints a text summary if requested

use crate::aggregator::AnalysisKind;
use crate::analysis::analyze;
use crate::output::{generate_text_summary, write_pprof, write_profile_json};
use crate::pprof::Profile;
use crate::trace::{EventSource, JsonTraceFile};
use crate::utils::config::{DEFAULT_TOP_STACKS, MAX_TOP_STACKS, PROFILE_EXTENSION};
use anyhow::{Context, Result};
use chrono::Utc;
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Arguments for the profile command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct ProfileArgs {
    /// JSON trace to read events from
    pub input: PathBuf,

    /// Which analysis to run
    pub kind: AnalysisKind,

    /// Output path for the pprof profile
    pub output: PathBuf,

    /// Output path for a JSON dump of the profile (optional)
    pub output_json: Option<PathBuf>,

    /// Print text summary to stdout
    pub print_summary: bool,

    /// Number of stacks shown in the summary
    pub top_stacks: usize,

    /// Record the generation time in the profile
    pub stamp_time: bool,
}

impl Default for ProfileArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::from("trace.json"),
            kind: AnalysisKind::Io,
            output: default_output_path(Path::new("."), AnalysisKind::Io),
            output_json: None,
            print_summary: false,
            top_stacks: DEFAULT_TOP_STACKS,
            stamp_time: true,
        }
    }
}

/// `<dir>/<kind>.pb.gz`
pub fn default_output_path(dir: &Path, kind: AnalysisKind) -> PathBuf {
    dir.join(format!("{}.{}", kind, PROFILE_EXTENSION))
}

/// Execute the profile command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Trace read or parse failures (no output is written)
/// * File write errors
pub fn execute_profile(args: ProfileArgs) -> Result<Profile> {
    let start_time = Instant::now();

    info!("Starting {} analysis of: {}", args.kind.description(), args.input.display());

    info!("Step 1/4: Reading trace events...");
    let source = JsonTraceFile::new(&args.input);
    let events = source
        .events()
        .with_context(|| format!("Failed to read trace events from {}", args.input.display()))?;

    debug!("Read {} events", events.len());

    info!("Step 2/4: Aggregating {} stacks...", args.kind);
    let mut profile = analyze(&events, args.kind);
    if args.stamp_time {
        profile = stamp(profile);
    }

    info!("Step 3/4: Writing output files...");
    write_pprof(&profile, &args.output).context("Failed to write pprof profile")?;
    info!("✓ Profile written to: {}", args.output.display());

    if let Some(json_path) = &args.output_json {
        write_profile_json(&profile, json_path).context("Failed to write JSON profile")?;
        info!("✓ JSON profile written to: {}", json_path.display());
    }

    if args.print_summary {
        info!("Step 4/4: Printing summary...");
        println!("\n{}", "=".repeat(80));
        println!("PROFILE SUMMARY: {}", args.kind.description());
        println!("{}", "=".repeat(80));
        println!("Trace:         {}", args.input.display());
        println!("Events:        {}", profile.total(0));
        println!("Total delay:   {} ns", profile.total(1));
        println!("Unique Stacks: {}", profile.sample.len());
        println!("\n{}", generate_text_summary(&profile, args.top_stacks));
        println!("{}", "=".repeat(80));
    } else {
        info!("Step 4/4: Skipping summary (not requested)");
    }

    let elapsed = start_time.elapsed();
    info!("Profile completed in {:.2}s", elapsed.as_secs_f64());

    Ok(profile)
}

/// Execute all four analyses over one trace
///
/// **Public** - events are read once and shared read-only by every analysis
///
/// # Returns
/// Paths of the written profiles, in analysis order
pub fn execute_all(input: &Path, output_dir: &Path, stamp_time: bool) -> Result<Vec<PathBuf>> {
    info!("Running all analyses over: {}", input.display());

    let source = JsonTraceFile::new(input);
    let events = source
        .events()
        .with_context(|| format!("Failed to read trace events from {}", input.display()))?;

    let mut written = Vec::with_capacity(AnalysisKind::ALL.len());
    for kind in AnalysisKind::ALL {
        let mut profile = analyze(&events, kind);
        if stamp_time {
            profile = stamp(profile);
        }

        let path = default_output_path(output_dir, kind);
        write_pprof(&profile, &path)
            .with_context(|| format!("Failed to write {} profile", kind))?;

        info!(
            "✓ {} profile: {} stacks -> {}",
            kind,
            profile.sample.len(),
            path.display()
        );
        written.push(path);
    }

    Ok(written)
}

/// Validate profile arguments
///
/// **Public** - can be called before execute_profile for early validation
pub fn validate_args(args: &ProfileArgs) -> Result<()> {
    if args.input.as_os_str().is_empty() {
        anyhow::bail!("Input trace path cannot be empty");
    }

    if args.output.as_os_str().is_empty() {
        anyhow::bail!("Output path cannot be empty");
    }

    if args.top_stacks == 0 {
        anyhow::bail!("top_stacks must be greater than 0");
    }

    if args.top_stacks > MAX_TOP_STACKS {
        anyhow::bail!("top_stacks is too large (max {})", MAX_TOP_STACKS);
    }

    Ok(())
}

fn stamp(profile: Profile) -> Profile {
    let now = Utc::now().timestamp_nanos_opt().unwrap_or(0);
    profile.with_time_nanos(now)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_args_valid() {
        assert!(validate_args(&ProfileArgs::default()).is_ok());
    }

    #[test]
    fn test_validate_args_empty_input() {
        let args = ProfileArgs {
            input: PathBuf::new(),
            ..Default::default()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_empty_output() {
        let args = ProfileArgs {
            output: PathBuf::new(),
            ..Default::default()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_top_stacks_zero() {
        let args = ProfileArgs {
            top_stacks: 0,
            ..Default::default()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_top_stacks_too_large() {
        let args = ProfileArgs {
            top_stacks: 2000,
            ..Default::default()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_default_output_path() {
        let path = default_output_path(Path::new("out"), AnalysisKind::Sched);
        assert_eq!(path, PathBuf::from("out/sched.pb.gz"));
    }
}
