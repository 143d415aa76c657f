//! Wall-clock source for the write engine

use chrono::{Local, NaiveDateTime};

/// Source of local wall-clock time.
///
/// The engine asks for the time once per dequeued message.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// The system's local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}
