//! Per-stack accumulation of matched events.
//!
//! An event contributes to a [`Record`] only when its kind matches the
//! analysis, it links to a terminating event, and it carries a non-zero
//! stack identity with at least one frame. Everything else is skipped
//! silently.

use super::classifier::AnalysisKind;
use crate::trace::{Event, Frame};
use log::{debug, warn};
use std::collections::btree_map::{self, BTreeMap};

/// Accumulated occurrences of one stack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record<'a> {
    /// First stack seen for this identity
    pub stack: &'a [Frame],

    /// Number of matched events
    pub count: u64,

    /// Sum of `link.ts - ts`, in nanoseconds; may be negative
    pub delay: i64,
}

impl<'a> Record<'a> {
    pub fn new(stack: &'a [Frame]) -> Self {
        Self {
            stack,
            count: 0,
            delay: 0,
        }
    }

    /// Fold `count` more occurrences totalling `delay` into this record
    pub fn merge(&mut self, count: u64, delay: i64) {
        self.count += count;
        self.delay = self.delay.wrapping_add(delay);
    }
}

/// Mapping from stack identity to its record, for one analysis pass
///
/// Iteration order is ascending stack identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackRecords<'a> {
    kind: AnalysisKind,
    records: BTreeMap<u64, Record<'a>>,
}

impl<'a> StackRecords<'a> {
    pub fn new(kind: AnalysisKind) -> Self {
        Self {
            kind,
            records: BTreeMap::new(),
        }
    }

    pub fn kind(&self) -> AnalysisKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, stack_id: u64) -> Option<&Record<'a>> {
        self.records.get(&stack_id)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, u64, Record<'a>> {
        self.records.iter()
    }

    /// Account `count` occurrences of `stack_id` totalling `delay`
    pub fn add(&mut self, stack_id: u64, stack: &'a [Frame], count: u64, delay: i64) {
        self.records
            .entry(stack_id)
            .or_insert_with(|| Record::new(stack))
            .merge(count, delay);
    }

    /// Fold a partial aggregation of the same analysis into this one
    ///
    /// Records are keyed by stack identity, so aggregating disjoint slices of
    /// the events and merging gives the same result as one pass over all.
    pub fn merge(&mut self, other: StackRecords<'a>) {
        debug_assert_eq!(self.kind, other.kind);
        for (stack_id, rec) in other.records {
            self.add(stack_id, rec.stack, rec.count, rec.delay);
        }
    }

    pub fn total_count(&self) -> u64 {
        self.records.values().map(|r| r.count).sum()
    }

    pub fn total_delay(&self) -> i64 {
        self.records
            .values()
            .fold(0i64, |acc, r| acc.wrapping_add(r.delay))
    }
}

impl<'r, 'a> IntoIterator for &'r StackRecords<'a> {
    type Item = (&'r u64, &'r Record<'a>);
    type IntoIter = btree_map::Iter<'r, u64, Record<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Aggregate `events` into per-stack records for `kind`
///
/// **Public** - main entry point for aggregation
///
/// Links are resolved against `events` itself; a link outside the slice
/// counts as no link.
pub fn aggregate(events: &[Event], kind: AnalysisKind) -> StackRecords<'_> {
    aggregate_range(events, 0..events.len(), kind)
}

/// Aggregate only the events at positions in `range`
///
/// Links still resolve against the whole slice, so callers can split one
/// sequence into chunks and [`StackRecords::merge`] the partial results.
pub fn aggregate_range(
    events: &[Event],
    range: std::ops::Range<usize>,
    kind: AnalysisKind,
) -> StackRecords<'_> {
    let mut records = StackRecords::new(kind);

    let chunk = events.get(range).unwrap_or(&[]);
    for ev in chunk {
        if let Some(delay) = elapsed(ev, events, kind) {
            records.add(ev.stack_id, &ev.stack, 1, delay);
        }
    }

    debug!(
        "Aggregated {} {} events into {} stacks",
        records.total_count(),
        kind,
        records.len()
    );

    for (stack_id, rec) in records.iter().filter(|(_, r)| r.delay < 0) {
        warn!(
            "Stack {} has negative cumulative {} delay ({} ns over {} events)",
            stack_id, kind, rec.delay, rec.count
        );
    }

    records
}

/// Interval between `ev` and its terminating event, if `ev` is retained
fn elapsed(ev: &Event, events: &[Event], kind: AnalysisKind) -> Option<i64> {
    if !kind.matches(ev.kind) || ev.stack_id == 0 || ev.stack.is_empty() {
        return None;
    }
    ev.link_ts(events).map(|end| end.wrapping_sub(ev.ts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::EventKind;

    fn stack() -> Vec<Frame> {
        vec![Frame::new(0x10, "a.go", "f", 10)]
    }

    #[test]
    fn test_record_merge() {
        let frames = stack();
        let mut rec = Record::new(&frames);
        rec.merge(1, 100);
        rec.merge(2, -30);
        assert_eq!(rec.count, 3);
        assert_eq!(rec.delay, 70);
    }

    #[test]
    fn test_elapsed_requires_link() {
        let events = vec![Event::new(EventKind::BlockNet, 10).with_stack(1, stack())];
        assert_eq!(elapsed(&events[0], &events, AnalysisKind::Io), None);
    }

    #[test]
    fn test_elapsed_negative_is_kept() {
        let events = vec![
            Event::new(EventKind::Syscall, 50)
                .with_stack(3, stack())
                .with_link(1),
            Event::new(EventKind::SyscallExit, 20),
        ];
        assert_eq!(elapsed(&events[0], &events, AnalysisKind::Syscall), Some(-30));
    }

    #[test]
    fn test_aggregate_range_out_of_bounds_is_empty() {
        let events = vec![Event::new(EventKind::BlockNet, 1)];
        let records = aggregate_range(&events, 3..7, AnalysisKind::Io);
        assert!(records.is_empty());
    }
}
