//! Error types for cchist.
//!
//! This module defines a hierarchical error taxonomy using `thiserror` for structured error
//! handling. Errors compose cleanly via `?` and `From` conversions.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level error of the binary, wrapping all domain-specific failures
//!   - [`InputError`] - Log file/stdin reading failures (file not found, no input, IO)
//!   - [`ConfigError`] - Config file read/parse failures
//!   - [`LoggingError`] - Tracing subscriber setup failures
//!   - `std::io::Error` - Failures writing the rendered output
//! - [`ParseError`] - Per-line JSONL parsing failures (malformed JSON, missing
//!   fields, bad encoding). Never fatal: see below.
//!
//! # Error Recovery Strategy
//!
//! Parsing errors are **non-fatal**: a malformed JSONL line is recorded as a
//! [`Diagnostic`](crate::model::Diagnostic), reported through `tracing`, and skipped.
//! Assembly and diffing never fail. Only an unreadable source is surfaced to the caller.

use crate::config::ConfigError;
use crate::logging::LoggingError;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error encompassing all fatal failure modes.
///
/// All domain-specific error types automatically convert to `AppError` via `From`
/// implementations, enabling clean error propagation with the `?` operator.
///
/// # Examples
///
/// ```no_run
/// use cchist::model::error::{AppError, InputError};
///
/// fn run_app() -> Result<(), AppError> {
///     // InputError automatically converts to AppError via From
///     let _input = read_log_file()?;
///     Ok(())
/// }
/// # fn read_log_file() -> Result<(), InputError> { Ok(()) }
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Failed to read input from file or stdin.
    ///
    /// The log cannot be processed at all; the binary reports the error and exits.
    #[error("Failed to read input: {0}")]
    InputRead(#[from] InputError),

    /// The configuration file exists but could not be used.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The tracing subscriber could not be installed.
    #[error("Logging setup failed: {0}")]
    Logging(#[from] LoggingError),

    /// Writing the rendered transcript failed (e.g., broken pipe).
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),
}

/// Errors encountered when reading log input from files or stdin.
///
/// # Recovery Patterns
///
/// - **FileNotFound**: Display error and exit (user provided invalid path)
/// - **NoInput**: Display usage help - user must provide file path or pipe stdin
/// - **Io**: Generic I/O failures (permissions, disk errors) - display and exit
#[derive(Debug, Error)]
pub enum InputError {
    /// The specified log file does not exist at the given path.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use cchist::model::error::InputError;
    ///
    /// let err = InputError::FileNotFound {
    ///     path: PathBuf::from("/tmp/missing.jsonl")
    /// };
    /// assert!(err.to_string().contains("/tmp/missing.jsonl"));
    /// ```
    #[error("File not found: {path}")]
    FileNotFound {
        /// The filesystem path that was not found.
        path: PathBuf,
    },

    /// No input source was provided and stdin is an interactive terminal.
    ///
    /// # Examples
    ///
    /// ```
    /// use cchist::model::error::InputError;
    ///
    /// let msg = InputError::NoInput.to_string();
    /// assert!(msg.contains("file path or pipe data to stdin"));
    /// ```
    #[error("No input source: provide a file path or pipe data to stdin")]
    NoInput,

    /// Generic I/O error reading from the input source.
    ///
    /// The `#[from]` attribute lets `?` convert `std::io::Error` directly.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors encountered when parsing one JSONL log line.
///
/// All variants carry the 1-based `line` so diagnostics point at the record
/// a user would see in an editor.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    /// A log line contains syntactically invalid JSON, or JSON of the wrong shape.
    ///
    /// # Examples
    ///
    /// ```
    /// use cchist::model::error::ParseError;
    ///
    /// let err = ParseError::InvalidJson {
    ///     line: 42,
    ///     message: "unexpected character '}' at position 15".to_string()
    /// };
    /// assert!(err.to_string().contains("line 42"));
    /// ```
    #[error("Invalid JSON at line {line}: {message}")]
    InvalidJson {
        /// The 1-based line number in the JSONL file where parsing failed.
        line: usize,
        /// The JSON parser error message (from `serde_json::Error::to_string()`).
        message: String,
    },

    /// A JSON object is missing a field required to classify the record.
    ///
    /// # Examples
    ///
    /// ```
    /// use cchist::model::error::ParseError;
    ///
    /// let err = ParseError::MissingField { line: 15, field: "type" };
    /// assert!(err.to_string().contains("'type'"));
    /// ```
    #[error("Missing required field '{field}' at line {line}")]
    MissingField {
        /// The 1-based line number of the incomplete record.
        line: usize,
        /// The JSON key that was expected (or was present but empty).
        field: &'static str,
    },

    /// A log line is not valid UTF-8.
    #[error("Invalid UTF-8 at line {line}")]
    InvalidEncoding {
        /// The 1-based line number of the undecodable line.
        line: usize,
    },
}

impl ParseError {
    /// Line the error refers to.
    pub fn line(&self) -> usize {
        match self {
            Self::InvalidJson { line, .. }
            | Self::MissingField { line, .. }
            | Self::InvalidEncoding { line } => *line,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn input_error_file_not_found_display() {
        let err = InputError::FileNotFound {
            path: PathBuf::from("/tmp/missing.jsonl"),
        };
        let msg = err.to_string();
        assert!(msg.contains("File not found"));
        assert!(msg.contains("/tmp/missing.jsonl"));
    }

    #[test]
    fn input_error_io_conversion() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let input_err: InputError = io_err.into();
        let msg = input_err.to_string();
        assert!(msg.contains("IO error"));
        assert!(msg.contains("access denied"));
    }

    #[test]
    fn parse_error_invalid_json_display() {
        let err = ParseError::InvalidJson {
            line: 42,
            message: "unexpected character '}'".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Invalid JSON"));
        assert!(msg.contains("line 42"));
        assert!(msg.contains("unexpected character '}'"));
    }

    #[test]
    fn parse_error_line_reports_every_variant() {
        let errors = vec![
            ParseError::InvalidJson {
                line: 1,
                message: "msg1".to_string(),
            },
            ParseError::MissingField {
                line: 100,
                field: "type",
            },
            ParseError::InvalidEncoding { line: 5 },
        ];

        for err in errors {
            assert!(err.to_string().contains(&format!("line {}", err.line())));
        }
    }

    #[test]
    fn app_error_from_input_error() {
        let app_err: AppError = InputError::NoInput.into();
        let msg = app_err.to_string();
        assert!(msg.contains("Failed to read input"));
        assert!(msg.contains("No input source"));
    }

    #[test]
    fn app_error_nested_io_through_input_error() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let input_err: InputError = io_err.into();
        let app_err: AppError = input_err.into();
        let msg = app_err.to_string();
        assert!(msg.contains("Failed to read input"));
        assert!(msg.contains("IO error"));
        assert!(msg.contains("file not found"));
    }

    #[test]
    fn app_error_from_output_io_error() {
        let io_err = io::Error::new(io::ErrorKind::BrokenPipe, "pipe broken");
        let app_err: AppError = io_err.into();
        assert!(app_err.to_string().contains("Output error"));
    }
}
