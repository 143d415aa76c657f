//! Observability for the log service
//!
//! - Structured diagnostics (JSON lines) for failures the asynchronous
//!   API cannot return to a caller
//! - Counters for every per-message outcome
//!
//! Diagnostics are printed only in console-echo mode; counters are
//! always maintained.

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{EngineMetrics, MetricsSnapshot};
