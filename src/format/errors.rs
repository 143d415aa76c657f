//! Formatter errors

use thiserror::Error;

/// Result type for formatter operations
pub type FormatResult<T> = Result<T, FormatError>;

/// Conditions under which a stored line cannot be merged with a new entry.
///
/// None of these are fatal: the write engine degrades to a warning line
/// plus a fresh entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("stored data has {stored} values but the entry carries {incoming}")]
    LengthMismatch { stored: usize, incoming: usize },

    #[error("cannot convert stored value '{0}'")]
    InvalidValue(String),

    #[error("malformed data segment: {0}")]
    MalformedSegment(String),
}
