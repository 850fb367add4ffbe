//! Profiles in the pprof format.
//!
//! This module handles:
//! - The in-memory profile model (functions, locations, samples)
//! - Building a profile from aggregated stack records
//! - Encoding to and decoding from the `profile.proto` wire format

pub mod builder;
pub mod codec;
pub mod profile;
pub mod proto;

// Re-export main types
pub use builder::{build_profile, ProfileBuilder};
pub use profile::{Function, Line, Location, Profile, Sample, ValueType};
