//! Stdin-based log source for piped input.

use crate::model::error::InputError;
use std::io::{IsTerminal, StdinLock};

/// Stdin source for piped JSONL input (`cat session.jsonl | cchist`).
#[derive(Debug)]
pub struct StdinSource {
    stdin: std::io::Stdin,
}

impl StdinSource {
    /// Create a new StdinSource from stdin.
    ///
    /// # Errors
    ///
    /// Returns `InputError::NoInput` if stdin is a TTY (interactive terminal).
    /// This prevents blocking on user input when the user forgot to pipe data.
    pub fn new() -> Result<Self, InputError> {
        let stdin = std::io::stdin();
        if stdin.is_terminal() {
            return Err(InputError::NoInput);
        }
        Ok(Self { stdin })
    }

    /// Lock stdin for buffered reading.
    pub fn into_reader(self) -> StdinLock<'static> {
        self.stdin.lock()
    }
}
