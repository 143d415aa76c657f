//! Structured JSON diagnostics
//!
//! - One line per event
//! - `event` first, `severity` second, remaining fields sorted by key
//! - Synchronous, no buffering
//! - ERROR and FATAL go to stderr, everything else to stdout

use std::fmt;
use std::io::{self, Write};

use super::events::Event;

/// Diagnostic severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Normal operations
    Info = 1,
    /// Recoverable issues
    Warn = 2,
    /// Operation failures
    Error = 3,
    /// Unrecoverable
    Fatal = 4,
}

impl Severity {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }

    fn to_stderr(self) -> bool {
        self >= Severity::Error
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Writer of structured diagnostic lines
pub struct Logger;

impl Logger {
    /// Emit `event` at its own severity.
    pub fn emit(event: Event, fields: &[(&str, &str)]) {
        let severity = event.severity();
        if severity.to_stderr() {
            Self::emit_to(severity, event.as_str(), fields, &mut io::stderr());
        } else {
            Self::emit_to(severity, event.as_str(), fields, &mut io::stdout());
        }
    }

    /// Renders one diagnostic line into `writer`.
    pub fn emit_to<W: Write>(
        severity: Severity,
        event: &str,
        fields: &[(&str, &str)],
        writer: &mut W,
    ) {
        let line = Self::render(severity, event, fields);
        let _ = writer.write_all(line.as_bytes());
        let _ = writer.flush();
    }

    fn render(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
        let mut output = String::with_capacity(128);
        output.push_str("{\"event\":");
        output.push_str(&quote(event));
        output.push_str(",\"severity\":");
        output.push_str(&quote(severity.as_str()));

        let mut sorted: Vec<_> = fields.iter().collect();
        sorted.sort_by_key(|(key, _)| *key);
        for (key, value) in sorted {
            output.push(',');
            output.push_str(&quote(key));
            output.push(':');
            output.push_str(&quote(value));
        }

        output.push_str("}\n");
        output
    }
}

fn quote(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capture(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
        let mut buffer = Vec::new();
        Logger::emit_to(severity, event, fields, &mut buffer);
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Info < Severity::Warn);
        assert!(Severity::Warn < Severity::Error);
        assert!(Severity::Error < Severity::Fatal);
        assert!(Severity::Error.to_stderr());
        assert!(!Severity::Warn.to_stderr());
    }

    #[test]
    fn test_line_is_json() {
        let output = capture(Severity::Warn, "UNKNOWN_HANDLE", &[("handle", "4")]);
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["event"], "UNKNOWN_HANDLE");
        assert_eq!(parsed["severity"], "WARN");
        assert_eq!(parsed["handle"], "4");
    }

    #[test]
    fn test_fields_sorted_after_event() {
        let output = capture(Severity::Info, "E", &[("zeta", "1"), ("alpha", "2")]);
        let event = output.find("\"event\"").unwrap();
        let severity = output.find("\"severity\"").unwrap();
        let alpha = output.find("alpha").unwrap();
        let zeta = output.find("zeta").unwrap();
        assert!(event < severity && severity < alpha && alpha < zeta);
    }

    #[test]
    fn test_escapes_values() {
        let output = capture(Severity::Error, "E", &[("path", "a\"b\n\tc")]);
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["path"], "a\"b\n\tc");
        assert_eq!(output.matches('\n').count(), 1);
    }
}
