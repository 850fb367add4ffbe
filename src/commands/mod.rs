//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod profile;
pub mod utils;

// Re-export main command functions
pub use profile::{default_output_path, execute_all, execute_profile, validate_args, ProfileArgs};
pub use utils::{display_version, validate_profile_file};
