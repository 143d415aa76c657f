//! Diagnostic events emitted by the log service
//!
//! Events are explicit and typed; each carries a fixed severity.

use std::fmt;

use super::logger::Severity;

/// Observable events of the write engine and its supervisor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Worker thread entered its consume loop
    WorkerStart,
    /// Worker thread left its consume loop
    WorkerStop,
    /// Consume loop restarted after a panic
    WorkerRestarted,
    /// Entry addressed to an undeclared handle was dropped
    UnknownHandle,
    /// Stored data could not be merged; warning line written instead
    MergeDegraded,
    /// Log file could not be read
    ReadFailed,
    /// Log file could not be created or rewritten
    WriteFailed,
    /// Unroll sink rejected a line
    SinkWriteFailed,
}

impl Event {
    /// Returns the event name
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::WorkerStart => "WORKER_START",
            Event::WorkerStop => "WORKER_STOP",
            Event::WorkerRestarted => "WORKER_RESTARTED",
            Event::UnknownHandle => "UNKNOWN_HANDLE",
            Event::MergeDegraded => "MERGE_DEGRADED",
            Event::ReadFailed => "LOG_READ_FAILED",
            Event::WriteFailed => "LOG_WRITE_FAILED",
            Event::SinkWriteFailed => "SINK_WRITE_FAILED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::WorkerStart | Event::WorkerStop => Severity::Info,
            Event::UnknownHandle | Event::MergeDegraded => Severity::Warn,
            Event::WorkerRestarted
            | Event::ReadFailed
            | Event::WriteFailed
            | Event::SinkWriteFailed => Severity::Error,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
