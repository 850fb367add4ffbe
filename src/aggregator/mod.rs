//! Classification and aggregation of trace events.
//!
//! This module transforms a decoded event sequence into:
//! - The subset of events one analysis cares about
//! - Per-stack records (occurrence count, cumulative delay)

pub mod classifier;
pub mod records;

// Re-export main types and functions
pub use classifier::AnalysisKind;
pub use records::{aggregate, aggregate_range, Record, StackRecords};
