//! Entries travelling from producers to the write engine

use std::fmt;
use std::sync::mpsc::SyncSender;

use crate::registry::LogHandle;

/// Entry level. Part of an entry's identity for aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    /// Generic comment
    Log,
    /// Operation failure
    Error,
    /// Informational
    Info,
    /// Recoverable issue
    Warning,
    /// A panic was recovered
    Recovered,
    /// Fatal condition
    Panic,
    /// Emitted by the engine itself
    SystemWarning,
}

impl Level {
    /// Returns the text written to disk
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Log => "LOG",
            Level::Error => "ERROR",
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Recovered => "RECOVERED",
            Level::Panic => "PANIC",
            Level::SystemWarning => "SYSTEM-WARNING",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A producer-submitted log entry.
///
/// `id` identifies the entry for aggregation; `data` is summed into a
/// matching stored line when `aggregate` is set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogEntry {
    pub id: String,
    pub message: String,
    pub data: Vec<i64>,
    pub aggregate: bool,
}

impl LogEntry {
    /// Create a non-aggregating entry without data.
    pub fn new(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            message: message.into(),
            data: Vec::new(),
            aggregate: false,
        }
    }

    /// Attach data values.
    pub fn with_data(mut self, data: impl Into<Vec<i64>>) -> Self {
        self.data = data.into();
        self
    }

    /// Mark the entry as cumulative.
    pub fn aggregated(mut self) -> Self {
        self.aggregate = true;
        self
    }
}

/// An entry addressed to a log, as held by the queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedMessage {
    pub handle: LogHandle,
    pub level: Level,
    pub entry: LogEntry,
}

/// Commands consumed by the worker, in queue order.
#[derive(Debug)]
pub(crate) enum Command {
    Write(QueuedMessage),
    /// Acknowledged once every earlier command has been handled
    Flush(SyncSender<()>),
    Shutdown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_text() {
        assert_eq!(Level::Log.as_str(), "LOG");
        assert_eq!(Level::Recovered.as_str(), "RECOVERED");
        assert_eq!(Level::SystemWarning.to_string(), "SYSTEM-WARNING");
    }

    #[test]
    fn test_entry_builder() {
        let entry = LogEntry::new("disk", "usage").with_data([4, 2]).aggregated();
        assert_eq!(entry.id, "disk");
        assert_eq!(entry.data, vec![4, 2]);
        assert!(entry.aggregate);
        assert!(!LogEntry::new("a", "b").aggregate);
    }
}
