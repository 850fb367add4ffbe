//! Trace events and the sources that produce them.
//!
//! This module handles:
//! - The decoded event model (events, frames, event kinds)
//! - The `EventSource` seam the analyses pull events through
//! - A JSON event source for traces exported as JSON

pub mod event;
pub mod source;

// Re-export main types
pub use event::{Event, EventKind, Frame};
pub use source::{parse_events, EventSource, JsonTraceFile};
