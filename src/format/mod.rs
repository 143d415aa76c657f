//! Line formatting for log files
//!
//! Renders entries into the on-disk line schema in two modes:
//! - fresh: `now, id, level, message[, data]`
//! - merged: `original, id, level, message, summed data, now`
//!
//! Width limits are applied to id, message and level independently, and
//! the assembled line is trimmed of surrounding spaces.

mod errors;
mod line;
mod width;

pub use errors::{FormatError, FormatResult};
pub use line::{parse_values, render_values, LogLine, FIELD_DELIMITER, MIN_FIELDS};
pub use width::{fit_width, sanitize};

use std::borrow::Cow;

use chrono::NaiveDateTime;

use crate::engine::{Level, LogEntry};
use crate::registry::WidthLimits;

/// Timestamp layout used on disk and on the console, e.g. `Tue Mar: 5 09:07 2024`
pub const TIMESTAMP_FORMAT: &str = "%a %b:%e %H:%M %Y";

/// Renders a wall-clock time with [`TIMESTAMP_FORMAT`].
pub fn format_timestamp(time: &NaiveDateTime) -> String {
    time.format(TIMESTAMP_FORMAT).to_string()
}

/// Formatter bound to one log file's width limits.
#[derive(Debug, Clone, Copy, Default)]
pub struct Formatter {
    limits: WidthLimits,
}

impl Formatter {
    /// Create a formatter for the given limits.
    pub fn new(limits: WidthLimits) -> Self {
        Self { limits }
    }

    /// Returns the limits this formatter applies.
    pub fn limits(&self) -> WidthLimits {
        self.limits
    }

    /// The identity a stored line must carry to take a merge.
    ///
    /// This is the sanitized id and the level text before width limits
    /// apply, so entries whose ids only share a truncated prefix never
    /// merge. Under an id limit shorter than the id nothing merges.
    pub fn match_key(level: Level, entry: &LogEntry) -> (String, String) {
        let id = sanitize(&entry.id);
        (id.trim_matches(' ').to_string(), level.as_str().to_string())
    }

    /// Renders a fresh entry stamped with `now`.
    pub fn fresh(&self, level: Level, entry: &LogEntry, now: &str) -> String {
        let (id, level, message) = self.fields(level, entry);
        let data = if entry.data.is_empty() {
            None
        } else {
            Some(render_values(&entry.data))
        };

        finish(LogLine {
            timestamp: now,
            id: &id,
            level: &level,
            message: &message,
            data: data.as_deref(),
            updated: None,
        })
    }

    /// Renders a merge of `entry` into a stored line.
    ///
    /// The line keeps `original` as its leading timestamp, carries the
    /// elementwise sum of `stored` and the entry's data, and ends with
    /// `now`. Sums saturate at the `i64` bounds.
    ///
    /// # Errors
    ///
    /// `FormatError::LengthMismatch` if the stored and incoming lists
    /// differ in length.
    pub fn merged(
        &self,
        level: Level,
        entry: &LogEntry,
        original: &str,
        stored: &[i64],
        now: &str,
    ) -> FormatResult<String> {
        if stored.len() != entry.data.len() {
            return Err(FormatError::LengthMismatch {
                stored: stored.len(),
                incoming: entry.data.len(),
            });
        }

        let sums: Vec<i64> = stored
            .iter()
            .zip(&entry.data)
            .map(|(old, new)| old.saturating_add(*new))
            .collect();
        let data = render_values(&sums);
        let (id, level, message) = self.fields(level, entry);

        Ok(finish(LogLine {
            timestamp: original,
            id: &id,
            level: &level,
            message: &message,
            data: Some(&data),
            updated: Some(now),
        }))
    }

    /// Console rendering: `[now -- ]level -- id: message`.
    ///
    /// Width limits do not apply to console output.
    pub fn console(level: Level, entry: &LogEntry, now: Option<&str>) -> String {
        let body = format!("{} -- {}: {}", level, entry.id, entry.message);
        let rendered = match now {
            Some(now) => format!("{} -- {}", now, body),
            None => body,
        };
        rendered.trim_matches(' ').to_string()
    }

    fn fields<'e>(&self, level: Level, entry: &'e LogEntry) -> (Cow<'e, str>, Cow<'static, str>, Cow<'e, str>) {
        let id = fit(sanitize(&entry.id), self.limits.id);
        let message = fit(sanitize(&entry.message), self.limits.message);
        let level = fit(Cow::Borrowed(level.as_str()), self.limits.level);
        (id, level, message)
    }
}

fn fit<'a>(text: Cow<'a, str>, width: usize) -> Cow<'a, str> {
    match text {
        Cow::Borrowed(s) => fit_width(s, width),
        Cow::Owned(s) => Cow::Owned(fit_width(&s, width).into_owned()),
    }
}

fn finish(line: LogLine<'_>) -> String {
    line.to_string().trim_matches(' ').to_string()
}
