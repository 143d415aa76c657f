//! Registry of declared logs
//!
//! Maps each [`LogHandle`] to its file metadata and holds the output
//! modes shared by all logs. A single read/write lock guards both:
//! lookups from the write engine take the read lock, declare and
//! set-limits take the write lock.
//!
//! Handles are allocated under the write lock, so concurrent declares
//! always yield `0..N` with no gaps or duplicates.

mod meta;
mod modes;

pub use meta::{log_path, LogFileMeta, LogHandle, WidthLimits, LOG_DIR, LOG_EXTENSION};
pub use modes::{ModeFlags, UnrollSink};

use std::env;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use parking_lot::RwLock;

use crate::errors::{LogError, LogResult};

/// Handle table plus shared output modes.
#[derive(Debug, Default)]
pub struct Registry {
    state: RwLock<RegistryState>,
}

#[derive(Debug, Default)]
struct RegistryState {
    /// Indexed by handle
    logs: Vec<LogFileMeta>,
    modes: ModeFlags,
}

impl Registry {
    /// Create an empty registry with the given modes.
    pub fn new(modes: ModeFlags) -> Self {
        Self {
            state: RwLock::new(RegistryState {
                logs: Vec::new(),
                modes,
            }),
        }
    }

    /// Declares a log and returns its handle.
    ///
    /// The file lives under `<root>/log/`; when `root` is `None` the
    /// process working directory is used. The `log` directory is created
    /// if missing. The file itself is created by the first write.
    ///
    /// # Errors
    ///
    /// - `AERO_LOG_CWD_UNRESOLVED` if the working directory is unavailable
    /// - `AERO_LOG_DIR_CREATE_FAILED` if the directory cannot be created
    pub fn declare(
        &self,
        root: Option<&Path>,
        name: &str,
        daily_rotate: bool,
        today: NaiveDate,
    ) -> LogResult<LogHandle> {
        let mut state = self.state.write();

        let root = match root {
            Some(root) => root.to_path_buf(),
            None => env::current_dir().map_err(LogError::cwd_unresolved)?,
        };

        let log_dir = root.join(LOG_DIR);
        fs::create_dir_all(&log_dir).map_err(|e| {
            LogError::dir_create_failed(
                format!("Failed to create log directory: {}", log_dir.display()),
                e,
            )
        })?;

        let handle = LogHandle(state.logs.len());
        state.logs.push(LogFileMeta {
            handle,
            path: log_path(&root, name, daily_rotate, today),
            limits: WidthLimits::default(),
        });

        Ok(handle)
    }

    /// Sets width limits for message, id and level. 0 means unbounded.
    ///
    /// # Errors
    ///
    /// `AERO_LOG_UNKNOWN_HANDLE` if the handle was never declared.
    pub fn set_limits(
        &self,
        handle: LogHandle,
        message: usize,
        id: usize,
        level: usize,
    ) -> LogResult<()> {
        let mut state = self.state.write();
        let meta = state
            .logs
            .get_mut(handle.0)
            .ok_or_else(|| LogError::unknown_handle(handle.0))?;

        meta.limits = WidthLimits { id, message, level };
        Ok(())
    }

    /// Returns a copy of the metadata for `handle`.
    pub fn lookup(&self, handle: LogHandle) -> Option<LogFileMeta> {
        self.state.read().logs.get(handle.0).cloned()
    }

    /// Number of declared logs
    pub fn len(&self) -> usize {
        self.state.read().logs.len()
    }

    /// Whether no log has been declared
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of the current modes. The read lock is released on return.
    pub fn modes(&self) -> ModeFlags {
        self.state.read().modes.clone()
    }

    /// Whether internal diagnostics are printed
    pub fn console_echo(&self) -> bool {
        self.state.read().modes.console_echo
    }

    /// Console echo flag, or `None` if the lock is held exclusively.
    pub fn try_console_echo(&self) -> Option<bool> {
        self.state.try_read().map(|state| state.modes.console_echo)
    }

    pub fn set_console_echo(&self, enabled: bool) {
        self.state.write().modes.console_echo = enabled;
    }

    pub fn set_verbose(&self, enabled: bool) {
        self.state.write().modes.verbose = enabled;
    }

    /// Replaces the unroll sink. `None` disables unroll mode.
    ///
    /// A previously installed sink is released; failures releasing it
    /// are ignored since the sink is being discarded.
    pub fn set_unroll(&self, sink: Option<UnrollSink>) {
        let previous = std::mem::replace(&mut self.state.write().modes.unroll, sink.map(Arc::new));
        if let Some(previous) = previous {
            let _ = previous.release();
        }
    }

    /// Releases every resource the registry holds.
    ///
    /// Log metadata holds no open files; the unroll sink is the only
    /// resource. Declared logs stay valid and later writes still land.
    ///
    /// # Errors
    ///
    /// `AERO_LOG_CLOSE_FAILED` if the sink fails to flush.
    pub fn close(&self) -> LogResult<()> {
        let sink = self.state.write().modes.unroll.take();
        match sink {
            Some(sink) => {
                let path = sink.path().display().to_string();
                sink.release().map_err(|e| {
                    LogError::close_failed(format!("Failed to release unroll sink: {}", path), e)
                })
            }
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::LogErrorCode;
    use tempfile::TempDir;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
    }

    #[test]
    fn test_declare_assigns_sequential_handles() {
        let tmp = TempDir::new().unwrap();
        let registry = Registry::default();

        let a = registry.declare(Some(tmp.path()), "a", false, day()).unwrap();
        let b = registry.declare(Some(tmp.path()), "b", true, day()).unwrap();

        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_declare_creates_log_directory() {
        let tmp = TempDir::new().unwrap();
        let registry = Registry::default();

        let handle = registry.declare(Some(tmp.path()), "events", false, day()).unwrap();

        assert!(tmp.path().join(LOG_DIR).is_dir());
        let meta = registry.lookup(handle).unwrap();
        assert_eq!(meta.path, tmp.path().join("log/events.logfile"));
        assert!(!meta.path.exists());
    }

    #[test]
    fn test_declare_fails_when_directory_cannot_be_created() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("not_a_dir");
        fs::write(&blocker, b"file").unwrap();

        let registry = Registry::default();
        let err = registry.declare(Some(&blocker), "x", false, day()).unwrap_err();

        assert_eq!(err.code(), LogErrorCode::AeroLogDirCreateFailed);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_set_limits() {
        let tmp = TempDir::new().unwrap();
        let registry = Registry::default();
        let handle = registry.declare(Some(tmp.path()), "a", false, day()).unwrap();

        registry.set_limits(handle, 5, 3, 4).unwrap();

        let limits = registry.lookup(handle).unwrap().limits;
        assert_eq!(limits, WidthLimits { id: 3, message: 5, level: 4 });
    }

    #[test]
    fn test_set_limits_unknown_handle() {
        let registry = Registry::default();
        let err = registry.set_limits(LogHandle(9), 1, 1, 1).unwrap_err();
        assert_eq!(err.code(), LogErrorCode::AeroLogUnknownHandle);
    }

    #[test]
    fn test_lookup_unknown_handle() {
        assert!(Registry::default().lookup(LogHandle(0)).is_none());
    }

    #[test]
    fn test_close_without_sink_is_ok() {
        assert!(Registry::default().close().is_ok());
    }

    #[test]
    fn test_close_releases_sink() {
        let tmp = TempDir::new().unwrap();
        let registry = Registry::default();
        registry.set_unroll(Some(UnrollSink::open(&tmp.path().join("unroll.txt")).unwrap()));
        assert!(registry.modes().unroll.is_some());

        registry.close().unwrap();

        assert!(registry.modes().unroll.is_none());
    }

    #[test]
    fn test_modes_copy_does_not_hold_lock() {
        let tmp = TempDir::new().unwrap();
        let sink_path = tmp.path().join("unroll.txt");
        let registry = Registry::default();
        registry.set_unroll(Some(UnrollSink::open(&sink_path).unwrap()));

        let modes = registry.modes();
        // Both need the write lock while the copy is alive
        let handle = registry.declare(Some(tmp.path()), "app", false, day()).unwrap();
        registry.set_limits(handle, 5, 3, 4).unwrap();
        registry.close().unwrap();

        modes.unroll.as_ref().unwrap().write_line("LOG -- late: still lands").unwrap();
        drop(modes);
        assert_eq!(
            std::fs::read_to_string(&sink_path).unwrap(),
            "LOG -- late: still lands\n"
        );
    }
}
