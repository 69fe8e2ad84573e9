//! Diagnostics for unparseable JSONL lines.
//!
//! When a JSONL line cannot be parsed into an [`Event`](crate::model::Event),
//! the event store records a `Diagnostic` and moves on to the next line.

use crate::model::ParseError;
use serde::{Deserialize, Serialize};

/// Longest raw-line excerpt kept in a diagnostic, in bytes.
const MAX_EXCERPT_BYTES: usize = 200;

/// A JSONL line that was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    line_number: usize,
    excerpt: String,
    message: String,
}

impl Diagnostic {
    /// Create a new diagnostic.
    ///
    /// # Arguments
    ///
    /// * `line_number` - The line number in the JSONL file (1-indexed)
    /// * `raw_line` - The raw line content; truncated to a short excerpt
    /// * `message` - Human-readable error message
    pub fn new(line_number: usize, raw_line: &str, message: impl Into<String>) -> Self {
        Self {
            line_number,
            excerpt: excerpt(raw_line),
            message: message.into(),
        }
    }

    /// Create a diagnostic from a parse error.
    pub fn from_parse_error(raw_line: &str, error: &ParseError) -> Self {
        Self::new(error.line(), raw_line, error.to_string())
    }

    /// Get the line number where the error occurred.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Get the (possibly truncated) raw line content.
    pub fn excerpt(&self) -> &str {
        &self.excerpt
    }

    /// Get the error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

fn excerpt(raw: &str) -> String {
    if raw.len() <= MAX_EXCERPT_BYTES {
        return raw.to_string();
    }
    let mut end = MAX_EXCERPT_BYTES;
    while !raw.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &raw[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_line_is_kept_verbatim() {
        let diag = Diagnostic::new(4, "{not json", "bad");
        assert_eq!(diag.line_number(), 4);
        assert_eq!(diag.excerpt(), "{not json");
        assert_eq!(diag.message(), "bad");
    }

    #[test]
    fn long_line_is_truncated_on_char_boundary() {
        let raw = "é".repeat(300);
        let diag = Diagnostic::new(1, &raw, "bad");
        assert!(diag.excerpt().ends_with('…'));
        assert!(diag.excerpt().len() <= MAX_EXCERPT_BYTES + '…'.len_utf8());
    }

    #[test]
    fn from_parse_error_uses_error_line() {
        let err = ParseError::MissingField {
            line: 9,
            field: "type",
        };
        let diag = Diagnostic::from_parse_error("{}", &err);
        assert_eq!(diag.line_number(), 9);
        assert!(diag.message().contains("'type'"));
    }
}
