//! Process-wide service instance
//!
//! For code that cannot thread a [`LogService`] through its call graph.
//! The instance is started at most once, however many threads race to
//! initialize it.

use std::sync::OnceLock;

use parking_lot::{const_mutex, Mutex};

use super::LogService;
use crate::config::LoggerConfig;
use crate::errors::LogResult;

static GLOBAL: OnceLock<LogService> = OnceLock::new();
static INIT: Mutex<()> = const_mutex(());

/// Returns the process-wide service, starting it with defaults if needed.
pub fn global() -> LogResult<&'static LogService> {
    init_global(LoggerConfig::default())
}

/// Returns the process-wide service, starting it with `config` if needed.
///
/// `config` is ignored once the service is running.
pub fn init_global(config: LoggerConfig) -> LogResult<&'static LogService> {
    if let Some(service) = GLOBAL.get() {
        return Ok(service);
    }

    let _guard = INIT.lock();
    if let Some(service) = GLOBAL.get() {
        return Ok(service);
    }

    let service = LogService::start(config)?;
    Ok(GLOBAL.get_or_init(move || service))
}
