//! Per-log metadata

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

/// Directory, under the root, holding every log file
pub const LOG_DIR: &str = "log";

/// File extension of log files
pub const LOG_EXTENSION: &str = "logfile";

/// Opaque identifier of a declared log.
///
/// Assigned sequentially from 0 and never recycled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LogHandle(pub(crate) usize);

impl LogHandle {
    /// Returns the numeric value of the handle
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for LogHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fixed-width limits in characters. 0 means unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WidthLimits {
    pub id: usize,
    pub message: usize,
    pub level: usize,
}

/// Metadata of one declared log.
///
/// No file handle is kept: every write is a full read-rewrite cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFileMeta {
    pub handle: LogHandle,
    pub path: PathBuf,
    pub limits: WidthLimits,
}

impl LogFileMeta {
    /// Final path segment of the log file
    pub fn base_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Computes `<root>/log/<name>.logfile`, or
/// `<root>/log/<name>_<YYYY-MM-DD>.logfile` when rotating daily.
pub fn log_path(root: &Path, name: &str, daily_rotate: bool, today: NaiveDate) -> PathBuf {
    let file_name = if daily_rotate {
        format!("{}_{}.{}", name, today.format("%Y-%m-%d"), LOG_EXTENSION)
    } else {
        format!("{}.{}", name, LOG_EXTENSION)
    };
    root.join(LOG_DIR).join(file_name)
}
