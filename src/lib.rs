//! Sched Trace pprof
//!
//! Turns runtime execution-trace events (blocking, unblocking, syscall
//! entry, task creation) into pprof profiles for four analyses:
//! network I/O wait, synchronization blocking, blocking syscalls and
//! scheduler latency.
//!
//! This crate provides the core implementation for the
//! `trace-pprof` CLI tool.
//!
//! ## Getting Started
//!
//! ```bash
//! trace-pprof profile --input trace.json --kind block --summary
//! go tool pprof -svg block.pb.gz
//! ```
//!
//! From code, hand any [`trace::EventSource`] to one of the entry points in
//! [`analysis`]:
//!
//! ```ignore
//! let events: Vec<Event> = load_events()?;
//! let profile = sched_trace_pprof::analysis::io_profile(&events)?;
//! std::fs::write("io.pb.gz", profile.encode()?)?;
//! ```

pub mod aggregator;
pub mod analysis;
pub mod commands;
pub mod output;
pub mod pprof;
pub mod trace;
pub mod utils;

pub use aggregator::AnalysisKind;
pub use analysis::{analyze, block_profile, io_profile, sched_profile, syscall_profile};
pub use pprof::Profile;
pub use trace::{Event, EventKind, EventSource, Frame};
