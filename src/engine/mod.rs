//! Single-consumer write engine
//!
//! Producers enqueue [`QueuedMessage`]s on a bounded queue; exactly one
//! worker thread, run by the [`Supervisor`], applies them to log files
//! in queue order through the [`WriteEngine`].

mod clock;
mod message;
mod supervisor;
mod writer;

pub use clock::{Clock, SystemClock};
pub use message::{Level, LogEntry, QueuedMessage};
pub use supervisor::Supervisor;
pub use writer::{rebuild, write_atomic, Rebuilt, WriteEngine, WriteOutcome, WARNING_ID};

pub(crate) use message::Command;
