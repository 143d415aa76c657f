//! Process-wide output modes

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::errors::{LogError, LogResult};

/// Output modes shared by every declared log.
///
/// Cloning is cheap; a clone shares the unroll sink, so mirroring can
/// write to it without holding the registry lock.
#[derive(Debug, Clone, Default)]
pub struct ModeFlags {
    /// Print internal diagnostics
    pub console_echo: bool,
    /// Mirror each entry to stdout
    pub verbose: bool,
    /// Mirror each entry to the diagnostic sink
    pub unroll: Option<Arc<UnrollSink>>,
}

/// Append-only diagnostic sink used by unroll mode.
#[derive(Debug)]
pub struct UnrollSink {
    path: PathBuf,
    file: File,
}

impl UnrollSink {
    /// Opens (or creates) the sink in append mode.
    pub fn open(path: &Path) -> LogResult<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                LogError::sink_open_failed(
                    format!("Failed to open unroll sink: {}", path.display()),
                    e,
                )
            })?;

        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    /// Returns the sink path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one line.
    pub fn write_line(&self, line: &str) -> io::Result<()> {
        let mut out = String::with_capacity(line.len() + 1);
        out.push_str(line);
        out.push('\n');
        (&self.file).write_all(out.as_bytes())
    }

    /// Flushes the sink to disk. The file closes once the last clone of
    /// the owning modes is dropped.
    pub fn release(&self) -> io::Result<()> {
        self.file.sync_all()
    }
}
