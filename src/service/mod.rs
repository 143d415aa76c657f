//! The log service: the public face of the write engine
//!
//! A [`LogService`] owns the registry, the bounded submission queue and
//! the single supervised worker thread. Clones share all of them, so any
//! number of producer threads can submit through their own clone.
//!
//! Setup operations (`declare`, `set_limits`, `set_unroll`, `close`)
//! return errors directly. Logging operations are fire-and-forget: they
//! block only while the queue is full and never report what happened on
//! disk.

mod fatal;
mod global;

pub use fatal::{Fatal, FATAL_EXIT_CODE};
pub use global::{global, init_global};

use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, SyncSender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use parking_lot::Mutex;

use crate::config::LoggerConfig;
use crate::engine::{Clock, Command, Level, LogEntry, QueuedMessage, Supervisor, SystemClock, WriteEngine};
use crate::errors::{LogError, LogResult};
use crate::observability::{EngineMetrics, MetricsSnapshot};
use crate::registry::{LogFileMeta, LogHandle, ModeFlags, Registry, UnrollSink};

/// Name of the worker thread
pub const WORKER_THREAD_NAME: &str = "aerolog-writer";

/// Id used by [`LogService::set_error_if_present`] when none is given
pub const MISSING_ID: &str = "n/a";

/// Handle to a running log service.
#[derive(Clone)]
pub struct LogService {
    inner: Arc<ServiceInner>,
}

struct ServiceInner {
    registry: Arc<Registry>,
    metrics: Arc<EngineMetrics>,
    clock: Arc<dyn Clock>,
    sender: SyncSender<Command>,
    root_dir: Option<PathBuf>,
    grace_period: Duration,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl LogService {
    /// Starts a service using the system clock.
    pub fn start(config: LoggerConfig) -> LogResult<Self> {
        Self::start_with_clock(config, Arc::new(SystemClock))
    }

    /// Starts a service with an explicit clock.
    ///
    /// # Errors
    ///
    /// - `AERO_LOG_INVALID_CONFIG` if the config fails validation
    /// - `AERO_LOG_SINK_OPEN_FAILED` if `unroll_path` cannot be opened
    /// - `AERO_LOG_WORKER_SPAWN_FAILED` if the worker thread cannot start
    pub fn start_with_clock(config: LoggerConfig, clock: Arc<dyn Clock>) -> LogResult<Self> {
        config.validate()?;

        let unroll = match &config.unroll_path {
            Some(path) => Some(Arc::new(UnrollSink::open(path)?)),
            None => None,
        };
        let registry = Arc::new(Registry::new(ModeFlags {
            console_echo: config.console_echo,
            verbose: config.verbose,
            unroll,
        }));
        let metrics = Arc::new(EngineMetrics::new());

        let (sender, receiver) = mpsc::sync_channel(config.queue_capacity);
        let engine = WriteEngine::new(Arc::clone(&registry), Arc::clone(&clock), Arc::clone(&metrics));
        let supervisor = Supervisor::new(engine, receiver);

        let worker = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || supervisor.run())
            .map_err(LogError::worker_spawn_failed)?;

        Ok(Self {
            inner: Arc::new(ServiceInner {
                registry,
                metrics,
                clock,
                sender,
                root_dir: config.root_dir.clone(),
                grace_period: config.grace_period(),
                worker: Mutex::new(Some(worker)),
            }),
        })
    }

    /// Declares a log named `name`, rotated daily if `daily_rotate`.
    ///
    /// See [`Registry::declare`] for the path layout and errors.
    pub fn declare(&self, name: &str, daily_rotate: bool) -> LogResult<LogHandle> {
        let today = self.inner.clock.now().date();
        self.inner
            .registry
            .declare(self.inner.root_dir.as_deref(), name, daily_rotate, today)
    }

    /// Sets width limits for message, id and level. 0 means unbounded.
    pub fn set_limits(&self, handle: LogHandle, message: usize, id: usize, level: usize) -> LogResult<()> {
        self.inner.registry.set_limits(handle, message, id, level)
    }

    /// Metadata of a declared log
    pub fn log_file(&self, handle: LogHandle) -> Option<LogFileMeta> {
        self.inner.registry.lookup(handle)
    }

    /// Path of a declared log's file
    pub fn path(&self, handle: LogHandle) -> Option<PathBuf> {
        self.log_file(handle).map(|meta| meta.path)
    }

    /// Enqueues an entry. Blocks while the queue is full.
    ///
    /// Entries submitted after [`shutdown`](Self::shutdown) are dropped.
    pub fn submit(&self, handle: LogHandle, level: Level, entry: LogEntry) {
        let _ = self
            .inner
            .sender
            .send(Command::Write(QueuedMessage { handle, level, entry }));
    }

    pub fn log(&self, handle: LogHandle, entry: LogEntry) {
        self.submit(handle, Level::Log, entry);
    }

    pub fn error(&self, handle: LogHandle, entry: LogEntry) {
        self.submit(handle, Level::Error, entry);
    }

    pub fn info(&self, handle: LogHandle, entry: LogEntry) {
        self.submit(handle, Level::Info, entry);
    }

    pub fn warning(&self, handle: LogHandle, entry: LogEntry) {
        self.submit(handle, Level::Warning, entry);
    }

    pub fn recovered(&self, handle: LogHandle, entry: LogEntry) {
        self.submit(handle, Level::Recovered, entry);
    }

    /// Enqueues a PANIC entry.
    ///
    /// With `terminate`, waits the grace period so the worker can write
    /// the entry, then returns the fatal condition for the caller to act
    /// on. The wait is best effort: a backed-up queue may still hold the
    /// entry when it ends.
    pub fn panic(&self, handle: LogHandle, entry: LogEntry, terminate: bool) -> Option<Fatal> {
        self.submit(handle, Level::Panic, entry);
        if !terminate {
            return None;
        }

        thread::sleep(self.inner.grace_period);
        let log_name = self
            .log_file(handle)
            .map(|meta| meta.base_name())
            .unwrap_or_default();
        Some(Fatal::new(handle, log_name))
    }

    /// Emits an ERROR entry if `error` is present.
    ///
    /// Returns `false` iff an error was present and an entry was emitted.
    /// An empty `id` is recorded as `n/a`.
    pub fn set_error_if_present(
        &self,
        handle: LogHandle,
        description: &str,
        id: &str,
        error: Option<&dyn Error>,
        data: Vec<i64>,
        aggregate: bool,
    ) -> bool {
        if error.is_none() {
            return true;
        }

        let id = if id.is_empty() { MISSING_ID } else { id };
        self.error(
            handle,
            LogEntry {
                id: id.to_string(),
                message: description.to_string(),
                data,
                aggregate,
            },
        );
        false
    }

    /// Mirror every entry to stdout
    pub fn set_verbose(&self, enabled: bool) {
        self.inner.registry.set_verbose(enabled);
    }

    /// Print internal diagnostics
    pub fn set_console_echo(&self, enabled: bool) {
        self.inner.registry.set_console_echo(enabled);
    }

    /// Enables unroll mode against `path`, or disables it.
    ///
    /// # Errors
    ///
    /// `AERO_LOG_SINK_OPEN_FAILED` if the sink cannot be opened; the
    /// previous mode is kept.
    pub fn set_unroll(&self, enabled: bool, path: Option<&Path>) -> LogResult<()> {
        let sink = match (enabled, path) {
            (true, Some(path)) => Some(UnrollSink::open(path)?),
            (true, None) => {
                return Err(LogError::invalid_config("unroll requires a sink path"));
            }
            (false, _) => None,
        };
        self.inner.registry.set_unroll(sink);
        Ok(())
    }

    /// Releases held resources. The worker keeps running.
    pub fn close(&self) -> LogResult<()> {
        self.inner.registry.close()
    }

    /// Blocks until everything queued before this call has been handled.
    pub fn flush(&self) {
        let (ack, done) = mpsc::sync_channel(1);
        if self.inner.sender.send(Command::Flush(ack)).is_ok() {
            let _ = done.recv();
        }
    }

    /// Drains already-queued entries, stops the worker and joins it.
    ///
    /// Affects every clone. Calling it again is a no-op.
    pub fn shutdown(&self) {
        let worker = self.inner.worker.lock().take();
        if let Some(worker) = worker {
            let _ = self.inner.sender.send(Command::Shutdown);
            let _ = worker.join();
        }
    }

    /// Counters of the write engine
    pub fn metrics(&self) -> MetricsSnapshot {
        self.inner.metrics.snapshot()
    }

    /// Number of declared logs
    pub fn declared(&self) -> usize {
        self.inner.registry.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io;
    use tempfile::TempDir;

    fn start(tmp: &TempDir) -> LogService {
        LogService::start(LoggerConfig::rooted(tmp.path())).unwrap()
    }

    #[test]
    fn test_first_entry_creates_file() {
        let tmp = TempDir::new().unwrap();
        let service = start(&tmp);
        let handle = service.declare("app", false).unwrap();

        service.info(handle, LogEntry::new("boot", "started"));
        service.flush();

        let content = fs::read_to_string(service.path(handle).unwrap()).unwrap();
        assert_eq!(content.lines().count(), 1);
        assert!(content.ends_with("\t\tboot\t\tINFO\t\tstarted\n"));
        assert_eq!(service.metrics().files_created, 1);
    }

    #[test]
    fn test_unknown_handle_is_counted() {
        let tmp = TempDir::new().unwrap();
        let service = start(&tmp);

        service.log(LogHandle(42), LogEntry::new("x", "y"));
        service.flush();

        assert_eq!(service.metrics().unknown_handles, 1);
        assert!(!tmp.path().join("log").exists());
    }

    #[test]
    fn test_set_error_if_present() {
        let tmp = TempDir::new().unwrap();
        let service = start(&tmp);
        let handle = service.declare("errors", false).unwrap();
        let failure = io::Error::new(io::ErrorKind::Other, "disk");

        assert!(service.set_error_if_present(handle, "fine", "op", None, vec![], false));
        assert!(!service.set_error_if_present(handle, "write failed", "", Some(&failure), vec![1], false));
        service.flush();

        let content = fs::read_to_string(service.path(handle).unwrap()).unwrap();
        assert_eq!(content.lines().count(), 1);
        assert!(content.contains("\t\tn/a\t\tERROR\t\twrite failed\t\t[1]"));
    }

    #[test]
    fn test_panic_without_terminate_returns_none() {
        let tmp = TempDir::new().unwrap();
        let service = start(&tmp);
        let handle = service.declare("app", false).unwrap();

        assert!(service.panic(handle, LogEntry::new("p", "bad"), false).is_none());
        service.flush();

        let content = fs::read_to_string(service.path(handle).unwrap()).unwrap();
        assert!(content.contains("\t\tPANIC\t\t"));
    }

    #[test]
    fn test_unroll_requires_path() {
        let tmp = TempDir::new().unwrap();
        let service = start(&tmp);
        assert!(service.set_unroll(true, None).is_err());
        assert!(service.set_unroll(false, None).is_ok());
    }

    #[test]
    fn test_shutdown_is_idempotent_and_drops_later_entries() {
        let tmp = TempDir::new().unwrap();
        let service = start(&tmp);
        let handle = service.declare("app", false).unwrap();

        service.log(handle, LogEntry::new("a", "before"));
        service.shutdown();
        service.shutdown();
        service.log(handle, LogEntry::new("b", "after"));
        service.flush();

        let content = fs::read_to_string(service.path(handle).unwrap()).unwrap();
        assert_eq!(content.lines().count(), 1);
        assert!(content.contains("before"));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let config = LoggerConfig {
            queue_capacity: 0,
            ..LoggerConfig::default()
        };
        assert!(LogService::start(config).is_err());
    }
}
