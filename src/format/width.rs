//! Fixed-width field rule

use std::borrow::Cow;
use std::cmp::Ordering;

/// Truncates `text` to `width` characters or right-pads it with spaces.
///
/// A width of 0 leaves the text untouched.
pub fn fit_width(text: &str, width: usize) -> Cow<'_, str> {
    if width == 0 {
        return Cow::Borrowed(text);
    }

    let len = text.chars().count();
    match len.cmp(&width) {
        Ordering::Equal => Cow::Borrowed(text),
        Ordering::Greater => Cow::Owned(text.chars().take(width).collect()),
        Ordering::Less => {
            let mut padded = String::with_capacity(text.len() + width - len);
            padded.push_str(text);
            padded.extend(std::iter::repeat(' ').take(width - len));
            Cow::Owned(padded)
        }
    }
}

/// Replaces characters that would break the line schema with spaces.
pub fn sanitize(text: &str) -> Cow<'_, str> {
    let breaks_schema = |c: char| matches!(c, '\t' | '\n' | '\r');
    if text.contains(breaks_schema) {
        Cow::Owned(text.replace(breaks_schema, " "))
    } else {
        Cow::Borrowed(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_width_is_unbounded() {
        assert_eq!(fit_width("a long message", 0), "a long message");
    }

    #[test]
    fn test_truncates_longer_text() {
        assert_eq!(fit_width("abcdef", 3), "abc");
    }

    #[test]
    fn test_pads_shorter_text() {
        assert_eq!(fit_width("hi", 5), "hi   ");
    }

    #[test]
    fn test_exact_width_is_borrowed() {
        assert!(matches!(fit_width("INFO", 4), Cow::Borrowed("INFO")));
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        assert_eq!(fit_width("héllo", 2), "hé");
        assert_eq!(fit_width("é", 3), "é  ");
    }

    #[test]
    fn test_sanitize_replaces_delimiters() {
        assert_eq!(sanitize("a\t\tb\nc\r"), "a  b c ");
        assert!(matches!(sanitize("plain"), Cow::Borrowed("plain")));
    }
}
