//! Write engine: the create-or-merge protocol
//!
//! For each dequeued message:
//! 1. Look up the handle; unknown handles are dropped and counted
//! 2. Mirror to stdout (verbose) and to the unroll sink
//! 3. Missing file: create it with one fresh line
//! 4. Existing file: rebuild its content, merging into the first
//!    matching line or appending, and rewrite it atomically
//!
//! The engine is the only writer of log files. Failures are never
//! retried; the entry's effect on disk is lost for that cycle.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::clock::Clock;
use super::message::{Level, LogEntry, QueuedMessage};
use crate::errors::{LogError, LogErrorCode, LogResult};
use crate::format::{format_timestamp, FormatError, Formatter, LogLine};
use crate::observability::{EngineMetrics, Event, Logger};
use crate::registry::{LogFileMeta, Registry};

/// Id of the synthetic warning line written when a merge fails
pub const WARNING_ID: &str = "logger";

/// What the engine did with one message.
#[derive(Debug)]
pub enum WriteOutcome {
    /// Handle was never declared
    Discarded,
    /// File did not exist and was created with one line
    Created,
    /// A fresh line was appended to an existing file
    Appended,
    /// The entry was summed into a stored line
    Merged,
    /// The stored line was replaced by a warning and a fresh line
    Degraded(FormatError),
    /// Reading or writing the file failed
    Failed(LogError),
}

/// Result of rebuilding a file's content for one entry.
#[derive(Debug)]
pub struct Rebuilt {
    /// Full new file content, one line per `\n`
    pub content: String,
    /// `Appended`, `Merged` or `Degraded`
    pub outcome: WriteOutcome,
}

/// Rebuilds `existing` with `entry` applied.
///
/// Only the first merge candidate is considered. Every other non-empty
/// line is copied through trimmed and otherwise untouched.
pub fn rebuild(
    existing: &str,
    level: Level,
    entry: &LogEntry,
    formatter: &Formatter,
    now: &str,
) -> Rebuilt {
    let (want_id, want_level) = Formatter::match_key(level, entry);
    let mut content = String::with_capacity(existing.len() + 128);
    let mut outcome = None;

    for raw in existing.lines() {
        // Spaces only: a line with an empty message ends in the delimiter
        let line = raw.trim_matches(' ');
        if line.is_empty() {
            continue;
        }

        let candidate = if entry.aggregate && outcome.is_none() {
            LogLine::parse(line).filter(|parsed| parsed.matches(&want_id, &want_level))
        } else {
            None
        };

        let Some(stored) = candidate else {
            push_line(&mut content, line);
            continue;
        };

        let merged = stored.values().and_then(|values| {
            formatter.merged(level, entry, stored.timestamp, &values, now)
        });
        match merged {
            Ok(merged) => {
                push_line(&mut content, &merged);
                outcome = Some(WriteOutcome::Merged);
            }
            Err(reason) => {
                let warning = LogEntry::new(
                    WARNING_ID,
                    format!("error converting accruing data from log {}", entry.id),
                );
                push_line(&mut content, &formatter.fresh(Level::SystemWarning, &warning, now));
                push_line(&mut content, &formatter.fresh(level, entry, now));
                outcome = Some(WriteOutcome::Degraded(reason));
            }
        }
    }

    let outcome = outcome.unwrap_or_else(|| {
        push_line(&mut content, &formatter.fresh(level, entry, now));
        WriteOutcome::Appended
    });

    Rebuilt { content, outcome }
}

fn push_line(content: &mut String, line: &str) {
    content.push_str(line);
    content.push('\n');
}

/// Replaces the file at `path` with `content`.
///
/// Writes a sibling `.tmp` file, fsyncs it and renames it over the
/// target, so readers see either the old or the new content.
pub fn write_atomic(path: &Path, content: &str) -> LogResult<()> {
    let temp_path = temp_path(path);

    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(|e| {
            LogError::write_failed(
                format!("Failed to create temp log file: {}", temp_path.display()),
                e,
            )
        })?;

    file.write_all(content.as_bytes())
        .and_then(|_| file.sync_all())
        .map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            LogError::write_failed(format!("Failed to write log file: {}", path.display()), e)
        })?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        LogError::write_failed(format!("Failed to replace log file: {}", path.display()), e)
    })?;

    if let Some(parent) = path.parent() {
        if let Ok(dir) = File::open(parent) {
            let _ = dir.sync_all();
        }
    }

    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Applies queued messages to log files.
pub struct WriteEngine {
    registry: Arc<Registry>,
    clock: Arc<dyn Clock>,
    metrics: Arc<EngineMetrics>,
}

impl WriteEngine {
    pub fn new(registry: Arc<Registry>, clock: Arc<dyn Clock>, metrics: Arc<EngineMetrics>) -> Self {
        Self {
            registry,
            clock,
            metrics,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub(crate) fn shared_registry(&self) -> Arc<Registry> {
        Arc::clone(&self.registry)
    }

    pub fn metrics(&self) -> &EngineMetrics {
        &self.metrics
    }

    /// Runs the create-or-merge protocol for one message.
    pub fn process(&self, message: &QueuedMessage) -> WriteOutcome {
        self.metrics.increment_messages();

        let Some(meta) = self.registry.lookup(message.handle) else {
            self.metrics.increment_unknown_handles();
            if self.registry.console_echo() {
                Logger::emit(
                    Event::UnknownHandle,
                    &[("handle", &message.handle.to_string()), ("id", &message.entry.id)],
                );
            }
            return WriteOutcome::Discarded;
        };

        let now = format_timestamp(&self.clock.now());
        let console_echo = self.mirror(message, &now);
        let formatter = Formatter::new(meta.limits);

        let outcome = match fs::read_to_string(&meta.path) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let line = formatter.fresh(message.level, &message.entry, &now);
                match write_atomic(&meta.path, &format!("{}\n", line)) {
                    Ok(()) => WriteOutcome::Created,
                    Err(e) => WriteOutcome::Failed(e),
                }
            }
            Err(e) => WriteOutcome::Failed(LogError::read_failed(
                format!("Failed to read log file: {}", meta.path.display()),
                e,
            )),
            Ok(existing) => {
                let rebuilt = rebuild(&existing, message.level, &message.entry, &formatter, &now);
                match write_atomic(&meta.path, &rebuilt.content) {
                    Ok(()) => rebuilt.outcome,
                    Err(e) => WriteOutcome::Failed(e),
                }
            }
        };

        self.record(&outcome, &meta, message, console_echo);
        outcome
    }

    /// Verbose and unroll mirroring. Returns the console-echo flag.
    ///
    /// Works on a copy of the modes so slow output never holds the
    /// registry lock against `declare` or `set_limits`.
    fn mirror(&self, message: &QueuedMessage, now: &str) -> bool {
        let modes = self.registry.modes();
        if modes.verbose {
            println!("{}", Formatter::console(message.level, &message.entry, Some(now)));
        }
        if let Some(sink) = &modes.unroll {
            let line = Formatter::console(message.level, &message.entry, None);
            if let Err(e) = sink.write_line(&line) {
                if modes.console_echo {
                    Logger::emit(
                        Event::SinkWriteFailed,
                        &[("path", &sink.path().display().to_string()), ("error", &e.to_string())],
                    );
                }
            }
        }
        modes.console_echo
    }

    fn record(&self, outcome: &WriteOutcome, meta: &LogFileMeta, message: &QueuedMessage, console_echo: bool) {
        match outcome {
            WriteOutcome::Discarded => {}
            WriteOutcome::Created => self.metrics.increment_files_created(),
            WriteOutcome::Appended => self.metrics.increment_lines_appended(),
            WriteOutcome::Merged => self.metrics.increment_lines_merged(),
            WriteOutcome::Degraded(reason) => {
                self.metrics.increment_merges_degraded();
                if console_echo {
                    Logger::emit(
                        Event::MergeDegraded,
                        &[
                            ("path", &meta.path.display().to_string()),
                            ("id", &message.entry.id),
                            ("reason", &reason.to_string()),
                        ],
                    );
                }
            }
            WriteOutcome::Failed(err) => {
                self.metrics.increment_io_failures();
                if console_echo {
                    let event = match err.code() {
                        LogErrorCode::AeroLogReadFailed => Event::ReadFailed,
                        _ => Event::WriteFailed,
                    };
                    Logger::emit(
                        event,
                        &[("path", &meta.path.display().to_string()), ("error", &err.to_string())],
                    );
                }
            }
        }
    }
}
