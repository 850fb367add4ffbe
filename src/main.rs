//! Trace pprof CLI
//!
//! Builds pprof profiles from runtime execution traces.
//! Render the output with any pprof-compatible viewer.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::{Path, PathBuf};

use sched_trace_pprof::commands::{
    default_output_path, display_version, execute_all, execute_profile, validate_args,
    validate_profile_file, ProfileArgs,
};
use sched_trace_pprof::utils::config::DEFAULT_TOP_STACKS;
use sched_trace_pprof::AnalysisKind;

/// Trace pprof - scheduling profiles from execution traces
#[derive(Parser, Debug)]
#[command(name = "trace-pprof")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Build one profile from a trace
    Profile {
        /// JSON trace with decoded events
        #[arg(short, long, env = "TRACE_PPROF_INPUT")]
        input: PathBuf,

        /// Analysis to run
        #[arg(short, long, value_enum, default_value_t = AnalysisKind::Io)]
        kind: AnalysisKind,

        /// Output path for the pprof profile (default: <kind>.pb.gz)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write the profile as JSON
        #[arg(long)]
        json: Option<PathBuf>,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,

        /// Number of stacks in the summary
        #[arg(long, default_value_t = DEFAULT_TOP_STACKS)]
        top: usize,

        /// Leave the profile timestamp unset
        #[arg(long)]
        no_timestamp: bool,
    },

    /// Build all four profiles from a trace
    All {
        /// JSON trace with decoded events
        #[arg(short, long, env = "TRACE_PPROF_INPUT")]
        input: PathBuf,

        /// Directory for <kind>.pb.gz files
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Leave the profile timestamps unset
        #[arg(long)]
        no_timestamp: bool,
    },

    /// Validate a pprof profile file
    Validate {
        /// Path to profile file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Profile {
            input,
            kind,
            output,
            json,
            summary,
            top,
            no_timestamp,
        } => {
            let args = ProfileArgs {
                input,
                kind,
                output: output.unwrap_or_else(|| default_output_path(Path::new("."), kind)),
                output_json: json,
                print_summary: summary,
                top_stacks: top,
                stamp_time: !no_timestamp,
            };

            // Validate args first
            validate_args(&args)?;

            execute_profile(args)?;
        }

        Commands::All {
            input,
            output_dir,
            no_timestamp,
        } => {
            execute_all(&input, &output_dir, !no_timestamp)?;
        }

        Commands::Validate { file } => {
            validate_profile_file(&file)?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
