//! CLI errors
//!
//! Wraps service errors with the stage of the invocation that failed.
//! Usage errors exit with status 2, everything else with 1.

use std::error::Error;
use std::fmt;

use crate::errors::LogError;

/// Stage of the invocation that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliErrorCode {
    /// `--config` could not be loaded
    ConfigError,
    /// Arguments parsed but cannot be applied
    UsageError,
    /// The log service rejected a setup call
    ServiceError,
}

impl CliErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "AERO_CLI_CONFIG_ERROR",
            Self::UsageError => "AERO_CLI_USAGE_ERROR",
            Self::ServiceError => "AERO_CLI_SERVICE_ERROR",
        }
    }

    /// Process exit status for this stage
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::UsageError => 2,
            Self::ConfigError | Self::ServiceError => 1,
        }
    }
}

/// A failed CLI invocation.
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
    source: Option<LogError>,
}

impl CliError {
    /// `--config` failed to load or validate
    pub fn config_error(source: LogError) -> Self {
        Self {
            code: CliErrorCode::ConfigError,
            message: format!("cannot use config: {}", source.message()),
            source: Some(source),
        }
    }

    pub fn usage_error(message: impl Into<String>) -> Self {
        Self {
            code: CliErrorCode::UsageError,
            message: message.into(),
            source: None,
        }
    }

    pub fn code(&self) -> CliErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Underlying service error, if any
    pub fn log_error(&self) -> Option<&LogError> {
        self.source.as_ref()
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)?;
        if let Some(source) = &self.source {
            write!(f, " [{}]", source.code().code())?;
        }
        Ok(())
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source.as_ref().map(|e| e as &(dyn Error + 'static))
    }
}

impl From<LogError> for CliError {
    fn from(source: LogError) -> Self {
        Self {
            code: CliErrorCode::ServiceError,
            message: source.message().to_string(),
            source: Some(source),
        }
    }
}

pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_error_keeps_log_code() {
        let err: CliError = LogError::unknown_handle(3).into();
        assert_eq!(err.code(), CliErrorCode::ServiceError);
        assert_eq!(err.code().exit_code(), 1);
        assert!(err.to_string().starts_with("AERO_CLI_SERVICE_ERROR"));
        assert!(err.to_string().ends_with("[AERO_LOG_UNKNOWN_HANDLE]"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_usage_error_has_no_source() {
        let err = CliError::usage_error("bad limits");
        assert_eq!(err.code().exit_code(), 2);
        assert!(err.log_error().is_none());
        assert_eq!(err.to_string(), "AERO_CLI_USAGE_ERROR: bad limits");
    }
}
