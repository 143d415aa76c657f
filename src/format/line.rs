//! On-disk line schema
//!
//! A persisted line is an ordered list of fields joined by a double tab:
//!
//! ```text
//! timestamp \t\t id \t\t level \t\t message [\t\t [v0,v1,...] [\t\t updated]]
//! ```
//!
//! `updated` only appears on merged lines. Parsing borrows from the raw
//! line and never normalizes it, so a line that is not rewritten can be
//! copied back verbatim.

use std::fmt;

use super::errors::{FormatError, FormatResult};

/// Delimiter between fields of a persisted line
pub const FIELD_DELIMITER: &str = "\t\t";

/// Minimum number of fields a line needs to be treated as a log line
pub const MIN_FIELDS: usize = 4;

/// A persisted line split into its schema fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogLine<'a> {
    /// Creation timestamp (the original one for merged lines)
    pub timestamp: &'a str,
    /// Entry id, possibly space-padded
    pub id: &'a str,
    /// Level text, possibly space-padded
    pub level: &'a str,
    /// Message, possibly space-padded
    pub message: &'a str,
    /// Bracketed integer list, if present
    pub data: Option<&'a str>,
    /// Timestamp of the latest merge, if any
    pub updated: Option<&'a str>,
}

impl<'a> LogLine<'a> {
    /// Splits a raw line into fields.
    ///
    /// Returns `None` if the line has fewer than [`MIN_FIELDS`] fields.
    pub fn parse(raw: &'a str) -> Option<Self> {
        let mut fields = raw.split(FIELD_DELIMITER);
        let timestamp = fields.next()?;
        let id = fields.next()?;
        let level = fields.next()?;
        let message = fields.next()?;

        Some(Self {
            timestamp,
            id,
            level,
            message,
            data: fields.next(),
            updated: fields.next(),
        })
    }

    /// Whether the stored id and level equal the given (unpadded) values.
    pub fn matches(&self, id: &str, level: &str) -> bool {
        self.id.trim_matches(' ') == id && self.level.trim_matches(' ') == level
    }

    /// Parses the stored integer list. A line without a data field holds
    /// an empty list.
    pub fn values(&self) -> FormatResult<Vec<i64>> {
        match self.data {
            Some(segment) => parse_values(segment),
            None => Ok(Vec::new()),
        }
    }
}

impl fmt::Display for LogLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{ts}{d}{id}{d}{level}{d}{msg}",
            ts = self.timestamp,
            id = self.id,
            level = self.level,
            msg = self.message,
            d = FIELD_DELIMITER,
        )?;
        if let Some(data) = self.data {
            write!(f, "{}{}", FIELD_DELIMITER, data)?;
            if let Some(updated) = self.updated {
                write!(f, "{}{}", FIELD_DELIMITER, updated)?;
            }
        }
        Ok(())
    }
}

/// Parses a `[v0,v1,...]` segment. `[]` is an empty list.
pub fn parse_values(segment: &str) -> FormatResult<Vec<i64>> {
    let inner = segment
        .trim()
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .ok_or_else(|| FormatError::MalformedSegment(segment.trim().to_string()))?;

    if inner.trim().is_empty() {
        return Ok(Vec::new());
    }

    inner
        .split(',')
        .map(|raw| {
            let value = raw.trim();
            value
                .parse::<i64>()
                .map_err(|_| FormatError::InvalidValue(value.to_string()))
        })
        .collect()
}

/// Renders values as a `[v0,v1,...]` segment.
pub fn render_values(values: &[i64]) -> String {
    let joined = values
        .iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(",");
    format!("[{}]", joined)
}
