//! Error types for the log service
//!
//! Error codes:
//! - AERO_LOG_CWD_UNRESOLVED (ERROR severity)
//! - AERO_LOG_DIR_CREATE_FAILED (ERROR severity)
//! - AERO_LOG_UNKNOWN_HANDLE (ERROR severity)
//! - AERO_LOG_SINK_OPEN_FAILED (ERROR severity)
//! - AERO_LOG_READ_FAILED (ERROR severity)
//! - AERO_LOG_WRITE_FAILED (ERROR severity)
//! - AERO_LOG_CLOSE_FAILED (ERROR severity)
//! - AERO_LOG_WORKER_SPAWN_FAILED (FATAL severity)
//! - AERO_LOG_INVALID_CONFIG (FATAL severity)
//!
//! Synchronous setup operations return these directly. Errors raised on
//! the worker side never reach a producer; they only surface through
//! diagnostics and metrics.

use std::fmt;
use std::io;

/// Severity levels for log service errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Operation fails, service continues
    Error,
    /// The embedding process should stop
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Log service error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogErrorCode {
    /// Working directory could not be resolved
    AeroLogCwdUnresolved,
    /// The `log` directory could not be created
    AeroLogDirCreateFailed,
    /// Handle was never declared
    AeroLogUnknownHandle,
    /// Unroll sink could not be opened
    AeroLogSinkOpenFailed,
    /// Log file could not be read
    AeroLogReadFailed,
    /// Log file could not be created or rewritten
    AeroLogWriteFailed,
    /// A held resource failed to release
    AeroLogCloseFailed,
    /// Worker thread could not be started
    AeroLogWorkerSpawnFailed,
    /// Configuration rejected by validation
    AeroLogInvalidConfig,
}

impl LogErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            LogErrorCode::AeroLogCwdUnresolved => "AERO_LOG_CWD_UNRESOLVED",
            LogErrorCode::AeroLogDirCreateFailed => "AERO_LOG_DIR_CREATE_FAILED",
            LogErrorCode::AeroLogUnknownHandle => "AERO_LOG_UNKNOWN_HANDLE",
            LogErrorCode::AeroLogSinkOpenFailed => "AERO_LOG_SINK_OPEN_FAILED",
            LogErrorCode::AeroLogReadFailed => "AERO_LOG_READ_FAILED",
            LogErrorCode::AeroLogWriteFailed => "AERO_LOG_WRITE_FAILED",
            LogErrorCode::AeroLogCloseFailed => "AERO_LOG_CLOSE_FAILED",
            LogErrorCode::AeroLogWorkerSpawnFailed => "AERO_LOG_WORKER_SPAWN_FAILED",
            LogErrorCode::AeroLogInvalidConfig => "AERO_LOG_INVALID_CONFIG",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            LogErrorCode::AeroLogWorkerSpawnFailed | LogErrorCode::AeroLogInvalidConfig => {
                Severity::Fatal
            }
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for LogErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Log service error with full context
#[derive(Debug)]
pub struct LogError {
    /// Error code
    code: LogErrorCode,
    /// Human-readable message
    message: String,
    /// Optional details about the error context
    details: Option<String>,
    /// Underlying IO error if applicable
    source: Option<io::Error>,
}

impl LogError {
    fn new(code: LogErrorCode, message: impl Into<String>, source: Option<io::Error>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            source,
        }
    }

    /// Working directory could not be resolved
    pub fn cwd_unresolved(source: io::Error) -> Self {
        Self::new(
            LogErrorCode::AeroLogCwdUnresolved,
            "Failed to resolve working directory",
            Some(source),
        )
    }

    /// Log directory could not be created
    pub fn dir_create_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self::new(LogErrorCode::AeroLogDirCreateFailed, message, Some(source))
    }

    /// Handle was never declared
    pub fn unknown_handle(handle: usize) -> Self {
        Self::new(
            LogErrorCode::AeroLogUnknownHandle,
            "Cannot set parameters of an undeclared log",
            None,
        )
        .with_details(format!("handle: {}", handle))
    }

    /// Unroll sink could not be opened
    pub fn sink_open_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self::new(LogErrorCode::AeroLogSinkOpenFailed, message, Some(source))
    }

    /// Log file read failed
    pub fn read_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self::new(LogErrorCode::AeroLogReadFailed, message, Some(source))
    }

    /// Log file write failed
    pub fn write_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self::new(LogErrorCode::AeroLogWriteFailed, message, Some(source))
    }

    /// Resource release failed
    pub fn close_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self::new(LogErrorCode::AeroLogCloseFailed, message, Some(source))
    }

    /// Worker thread could not be spawned
    pub fn worker_spawn_failed(source: io::Error) -> Self {
        Self::new(
            LogErrorCode::AeroLogWorkerSpawnFailed,
            "Failed to spawn log writer thread",
            Some(source),
        )
    }

    /// Configuration rejected
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::new(LogErrorCode::AeroLogInvalidConfig, message, None)
    }

    /// Attach context details
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Returns the error code
    pub fn code(&self) -> LogErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns additional error details
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    /// Returns whether this error is fatal
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for LogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        if let Some(ref source) = self.source {
            write!(f, ": {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for LogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for log service operations
pub type LogResult<T> = Result<T, LogError>;
