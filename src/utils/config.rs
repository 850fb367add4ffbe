//! Configuration and constants for the CLI and profile header.

/// Period descriptor written into every profile: one trace event per sample unit
pub const PERIOD_TYPE: (&str, &str) = ("trace", "count");
pub const PERIOD: i64 = 1;

/// Fixed two-column sample layout: `[count, duration]`
pub const SAMPLE_TYPES: [(&str, &str); 2] = [("contentions", "count"), ("delay", "nanoseconds")];

/// File extension used for encoded profiles
pub const PROFILE_EXTENSION: &str = "pb.gz";

/// Gzip stream magic, used to sniff compressed profiles on decode
pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

// Summary table limits
pub const DEFAULT_TOP_STACKS: usize = 10;
pub const MAX_TOP_STACKS: usize = 1000;

// Field names accepted for the event list when the trace is an object
pub const EVENT_FIELD_NAMES: &[&str] = &["events", "Events", "trace"];
