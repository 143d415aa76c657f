//! Service configuration
//!
//! All knobs are process-wide and affect every declared log. Loaded from
//! a JSON file; every field is optional.
//!
//! ```json
//! {
//!   "queue_capacity": 50,
//!   "console_echo": true,
//!   "verbose": false,
//!   "unroll_path": "/var/tmp/aerolog.unroll",
//!   "root_dir": "/srv/app",
//!   "grace_period_ms": 5000
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::{LogError, LogResult};

/// Default depth of the submission queue
pub const DEFAULT_QUEUE_CAPACITY: usize = 50;

/// Default delay between a terminating panic and the fatal signal
pub const DEFAULT_GRACE_PERIOD_MS: u64 = 5000;

/// Configuration for a [`LogService`](crate::LogService)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// Bounded queue depth; producers block when it is full
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Print internal diagnostics
    #[serde(default)]
    pub console_echo: bool,

    /// Mirror every entry to stdout
    #[serde(default)]
    pub verbose: bool,

    /// Enables unroll mode against this file at start
    #[serde(default)]
    pub unroll_path: Option<PathBuf>,

    /// Directory holding `log/`; defaults to the working directory
    #[serde(default)]
    pub root_dir: Option<PathBuf>,

    /// Grace period before a terminating panic is signalled
    #[serde(default = "default_grace_period_ms")]
    pub grace_period_ms: u64,
}

fn default_queue_capacity() -> usize {
    DEFAULT_QUEUE_CAPACITY
}

fn default_grace_period_ms() -> u64 {
    DEFAULT_GRACE_PERIOD_MS
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            console_echo: false,
            verbose: false,
            unroll_path: None,
            root_dir: None,
            grace_period_ms: DEFAULT_GRACE_PERIOD_MS,
        }
    }
}

impl LoggerConfig {
    /// Config rooted at `root_dir`, other fields at their defaults.
    pub fn rooted(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: Some(root_dir.into()),
            ..Self::default()
        }
    }

    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> LogResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            LogError::invalid_config(format!("Failed to read config {}: {}", path.display(), e))
        })?;

        let config: LoggerConfig = serde_json::from_str(&content)
            .map_err(|e| LogError::invalid_config(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Reject values the service cannot run with
    pub fn validate(&self) -> LogResult<()> {
        if self.queue_capacity == 0 {
            return Err(LogError::invalid_config("queue_capacity must be > 0"));
        }
        Ok(())
    }

    pub fn grace_period(&self) -> Duration {
        Duration::from_millis(self.grace_period_ms)
    }
}
