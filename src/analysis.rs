//! The four analyses: I/O wait, synchronization blocking, syscalls and
//! scheduler latency.
//!
//! Each entry point pulls events from a source, aggregates the matching ones
//! per stack and builds a profile. A source failure is returned as-is, with
//! no partial profile. Runs share nothing, so analyses over the same events
//! may run concurrently.

use crate::aggregator::{aggregate, AnalysisKind};
use crate::pprof::{build_profile, Profile};
use crate::trace::{Event, EventSource};
use crate::utils::error::ParseError;
use log::debug;

/// Run one analysis over already-decoded events
pub fn analyze(events: &[Event], kind: AnalysisKind) -> Profile {
    let records = aggregate(events, kind);
    debug!(
        "{} analysis: {} stacks, {} events, {} ns total",
        kind,
        records.len(),
        records.total_count(),
        records.total_delay()
    );
    build_profile(&records)
}

/// Pull events from `source` and run one analysis over them
pub fn profile_from_source<S>(source: &S, kind: AnalysisKind) -> Result<Profile, ParseError>
where
    S: EventSource + ?Sized,
{
    let events = source.events()?;
    Ok(analyze(&events, kind))
}

/// Time spent waiting on network I/O
pub fn io_profile<S: EventSource + ?Sized>(source: &S) -> Result<Profile, ParseError> {
    profile_from_source(source, AnalysisKind::Io)
}

/// Time spent blocked on channels, selects, sync primitives and condition variables
pub fn block_profile<S: EventSource + ?Sized>(source: &S) -> Result<Profile, ParseError> {
    profile_from_source(source, AnalysisKind::Block)
}

/// Time spent in blocking syscalls
pub fn syscall_profile<S: EventSource + ?Sized>(source: &S) -> Result<Profile, ParseError> {
    profile_from_source(source, AnalysisKind::Syscall)
}

/// Time between a task becoming runnable and being scheduled
pub fn sched_profile<S: EventSource + ?Sized>(source: &S) -> Result<Profile, ParseError> {
    profile_from_source(source, AnalysisKind::Sched)
}
