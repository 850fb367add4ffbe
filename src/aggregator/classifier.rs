//! Analysis kinds and the event kinds each one retains.
//!
//! | Analysis | Retained event kinds |
//! |---|---|
//! | `io` | block-on-network |
//! | `block` | channel send/recv, select, sync primitive, condition variable |
//! | `syscall` | syscall entry |
//! | `sched` | unblock, task creation |

use crate::trace::EventKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the four fixed analyses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisKind {
    /// Time spent waiting on network I/O
    Io,
    /// Time spent blocked on synchronization primitives
    Block,
    /// Time spent in blocking system calls
    Syscall,
    /// Time between a task becoming runnable and actually running
    Sched,
}

impl AnalysisKind {
    pub const ALL: [AnalysisKind; 4] = [
        AnalysisKind::Io,
        AnalysisKind::Block,
        AnalysisKind::Syscall,
        AnalysisKind::Sched,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AnalysisKind::Io => "io",
            AnalysisKind::Block => "block",
            AnalysisKind::Syscall => "syscall",
            AnalysisKind::Sched => "sched",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            AnalysisKind::Io => "network I/O wait",
            AnalysisKind::Block => "synchronization blocking",
            AnalysisKind::Syscall => "blocking syscalls",
            AnalysisKind::Sched => "scheduler latency",
        }
    }

    /// Whether events of `kind` belong to this analysis
    pub fn matches(self, kind: EventKind) -> bool {
        match self {
            AnalysisKind::Io => kind == EventKind::BlockNet,
            AnalysisKind::Block => matches!(
                kind,
                EventKind::BlockSend
                    | EventKind::BlockRecv
                    | EventKind::BlockSelect
                    | EventKind::BlockSync
                    | EventKind::BlockCond
            ),
            AnalysisKind::Syscall => kind == EventKind::Syscall,
            AnalysisKind::Sched => matches!(kind, EventKind::Unblock | EventKind::Create),
        }
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AnalysisKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AnalysisKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown analysis kind: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_EVENT_KINDS: [EventKind; 17] = [
        EventKind::BlockNet,
        EventKind::BlockSend,
        EventKind::BlockRecv,
        EventKind::BlockSelect,
        EventKind::BlockSync,
        EventKind::BlockCond,
        EventKind::Syscall,
        EventKind::Unblock,
        EventKind::Create,
        EventKind::Start,
        EventKind::End,
        EventKind::SyscallExit,
        EventKind::Block,
        EventKind::Sleep,
        EventKind::Sched,
        EventKind::Preempt,
        EventKind::Other,
    ];

    fn retained(kind: AnalysisKind) -> Vec<EventKind> {
        ALL_EVENT_KINDS
            .into_iter()
            .filter(|ev| kind.matches(*ev))
            .collect()
    }

    #[test]
    fn test_matching_table() {
        assert_eq!(retained(AnalysisKind::Io), vec![EventKind::BlockNet]);
        assert_eq!(
            retained(AnalysisKind::Block),
            vec![
                EventKind::BlockSend,
                EventKind::BlockRecv,
                EventKind::BlockSelect,
                EventKind::BlockSync,
                EventKind::BlockCond,
            ]
        );
        assert_eq!(retained(AnalysisKind::Syscall), vec![EventKind::Syscall]);
        assert_eq!(
            retained(AnalysisKind::Sched),
            vec![EventKind::Unblock, EventKind::Create]
        );
    }

    #[test]
    fn test_generic_block_is_not_sync_blocking() {
        assert!(!AnalysisKind::Block.matches(EventKind::Block));
        assert!(!AnalysisKind::Block.matches(EventKind::Sleep));
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!("io".parse::<AnalysisKind>().unwrap(), AnalysisKind::Io);
        assert_eq!("SCHED".parse::<AnalysisKind>().unwrap(), AnalysisKind::Sched);
        assert!("cpu".parse::<AnalysisKind>().is_err());
    }

    #[test]
    fn test_display_round_trips() {
        for kind in AnalysisKind::ALL {
            assert_eq!(kind.to_string().parse::<AnalysisKind>().unwrap(), kind);
        }
    }
}
