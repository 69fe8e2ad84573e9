//! Log input sources and the event store.
//!
//! This module provides input sources for JSONL log data:
//! - File loading for a path given on the command line
//! - Stdin for piped input
//! - [`EventStore`], which turns either one into an ordered event sequence

use crate::model::error::InputError;
use crate::model::{Diagnostic, Event, EventKind, ParseError};
use crate::parser::{parse_event_graceful, ParseResult};
use serde::Serialize;
use std::io::{BufRead, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub mod file;
pub mod stdin;

pub use file::FileSource;
pub use stdin::StdinSource;

/// Unified input source for JSONL log data.
///
/// Sum type enforces exactly one variant.
#[derive(Debug)]
pub enum InputSource {
    /// File source - opened and checked on construction
    File(FileSource),
    /// Stdin source - reads from piped stdin until EOF
    Stdin(StdinSource),
}

impl InputSource {
    /// Read the whole source through the event store.
    ///
    /// # Errors
    ///
    /// Returns `InputError::Io` if reading fails.
    pub fn load(self) -> Result<LoadedLog, InputError> {
        match self {
            InputSource::File(f) => EventStore::load(f.into_reader()),
            InputSource::Stdin(s) => EventStore::load(s.into_reader()),
        }
    }
}

/// Detect and create appropriate input source.
///
/// # Logic:
/// 1. If file path is provided: create FileSource
/// 2. If stdin is piped: use StdinSource
/// 3. Else: return InputError::NoInput
///
/// # Errors
///
/// Returns `InputError::NoInput` if no file is provided and stdin is a terminal.
/// Returns `InputError::FileNotFound` if the file does not exist.
/// Returns `InputError::Io` for other I/O errors opening the file.
pub fn detect_input_source(file: Option<PathBuf>) -> Result<InputSource, InputError> {
    match file {
        Some(path) => Ok(InputSource::File(FileSource::new(path)?)),
        None => Ok(InputSource::Stdin(StdinSource::new()?)),
    }
}

/// Events and diagnostics produced by one load.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadedLog {
    /// Parsed events in log order, summaries excluded.
    pub events: Vec<Event>,
    /// One entry per skipped line, in log order.
    pub diagnostics: Vec<Diagnostic>,
}

/// Parses a JSONL log into typed events.
///
/// Loading never stops at a bad line: it records a [`Diagnostic`], emits a
/// warning and moves on. Only failures of the underlying reader are errors.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventStore;

impl EventStore {
    /// Load every record from `reader`.
    ///
    /// # Errors
    ///
    /// Returns `InputError::Io` if the reader fails. Invalid UTF-8 is not a
    /// reader failure; it is reported as a diagnostic for that line.
    pub fn load<R: BufRead>(mut reader: R) -> Result<LoadedLog, InputError> {
        let mut log = LoadedLog::default();
        let mut buf = Vec::new();
        let mut line_number = 0;
        let mut summaries = 0usize;

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            line_number += 1;

            let line = match std::str::from_utf8(&buf) {
                Ok(line) => line,
                Err(_) => {
                    let raw = String::from_utf8_lossy(&buf);
                    let error = ParseError::InvalidEncoding { line: line_number };
                    log.push_diagnostic(Diagnostic::from_parse_error(
                        raw.trim_end_matches(['\n', '\r']),
                        &error,
                    ));
                    continue;
                }
            };

            let line = line.trim_end_matches(['\n', '\r']);
            if line.trim().is_empty() {
                continue;
            }

            match parse_event_graceful(line, line_number) {
                ParseResult::Valid(event) if event.kind() == &EventKind::Summary => {
                    summaries += 1;
                }
                ParseResult::Valid(event) => log.events.push(*event),
                ParseResult::Malformed(diagnostic) => log.push_diagnostic(diagnostic),
            }
        }

        debug!(
            lines = line_number,
            events = log.events.len(),
            skipped = log.diagnostics.len(),
            summaries,
            "Loaded log"
        );
        Ok(log)
    }

    /// Load a log file from disk.
    ///
    /// # Errors
    ///
    /// Returns `InputError::FileNotFound` if `path` does not exist, and
    /// `InputError::Io` for other read failures.
    pub fn load_path(path: impl AsRef<Path>) -> Result<LoadedLog, InputError> {
        Self::load(FileSource::new(path)?.into_reader())
    }

    /// Load a log held in memory.
    pub fn load_str(content: &str) -> LoadedLog {
        // Reading from a byte slice cannot fail
        Self::load(content.as_bytes()).unwrap_or_default()
    }
}

impl LoadedLog {
    fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        warn!(
            line = diagnostic.line_number(),
            error = %diagnostic.message(),
            "Skipping malformed log line"
        );
        self.diagnostics.push(diagnostic);
    }
}

/// Read everything from an unbuffered reader.
///
/// Convenience for callers holding a plain `Read`.
pub fn load_reader(reader: impl Read) -> Result<LoadedLog, InputError> {
    EventStore::load(std::io::BufReader::new(reader))
}
