//! aerolog - an aggregating, single-writer, file-backed log engine
//!
//! Entries sharing an identity (log, id, level) can be summed into one
//! stored line instead of appending a new one, which bounds file growth
//! for recurring counters. All file I/O is serialized through a single
//! supervised worker fed by a bounded queue.
//!
//! ```ignore
//! use aerolog::{LogEntry, LogService, LoggerConfig};
//!
//! let service = LogService::start(LoggerConfig::default())?;
//! let metrics = service.declare("metrics", true)?;
//! service.info(metrics, LogEntry::new("requests", "served").with_data([1]).aggregated());
//! ```

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod format;
pub mod observability;
pub mod registry;
pub mod service;

pub use config::LoggerConfig;
pub use engine::{Clock, Level, LogEntry, SystemClock};
pub use errors::{LogError, LogErrorCode, LogResult};
pub use registry::LogHandle;
pub use service::{global, init_global, Fatal, LogService};
