//! Decoded trace event model.
//!
//! Events are produced upstream and treated as read-only by every analysis.

use serde::{Deserialize, Serialize};

/// Scheduling transition recorded in the trace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Task blocked waiting on network readiness
    BlockNet,
    /// Task blocked on a channel send
    BlockSend,
    /// Task blocked on a channel receive
    BlockRecv,
    /// Task blocked in a select statement
    BlockSelect,
    /// Task blocked on a sync primitive (mutex, rwlock, waitgroup)
    BlockSync,
    /// Task blocked on a condition variable
    BlockCond,
    /// Task entered a blocking system call
    Syscall,
    /// Task made runnable by another task
    Unblock,
    /// Task created
    Create,
    Start,
    End,
    SyscallExit,
    Block,
    Sleep,
    Sched,
    Preempt,
    /// Anything the analyses never look at
    #[serde(other)]
    Other,
}

/// One call-stack entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Frame {
    /// Program counter, the identity of a location
    pub pc: u64,

    /// Source file name
    #[serde(default)]
    pub file: String,

    /// Function name
    #[serde(default, alias = "fn", alias = "function")]
    pub func: String,

    /// Source line number
    #[serde(default)]
    pub line: i64,
}

impl Frame {
    pub fn new(pc: u64, file: impl Into<String>, func: impl Into<String>, line: i64) -> Self {
        Self {
            pc,
            file: file.into(),
            func: func.into(),
            line,
        }
    }
}

/// One observed transition in the trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub kind: EventKind,

    /// Monotonic timestamp in nanoseconds
    #[serde(alias = "timestamp")]
    pub ts: i64,

    /// Stack identity; 0 means no stack was recorded
    #[serde(default, alias = "stk_id", alias = "stackID")]
    pub stack_id: u64,

    /// Frames, top of stack first
    #[serde(default, alias = "stk")]
    pub stack: Vec<Frame>,

    /// Position of the terminating event in the same sequence
    #[serde(default)]
    pub link: Option<usize>,
}

impl Event {
    pub fn new(kind: EventKind, ts: i64) -> Self {
        Self {
            kind,
            ts,
            stack_id: 0,
            stack: Vec::new(),
            link: None,
        }
    }

    pub fn with_stack(mut self, stack_id: u64, stack: Vec<Frame>) -> Self {
        self.stack_id = stack_id;
        self.stack = stack;
        self
    }

    pub fn with_link(mut self, link: usize) -> Self {
        self.link = Some(link);
        self
    }

    /// Timestamp of the terminating event, if the link resolves within `events`
    pub fn link_ts(&self, events: &[Event]) -> Option<i64> {
        self.link.and_then(|idx| events.get(idx)).map(|ev| ev.ts)
    }
}
