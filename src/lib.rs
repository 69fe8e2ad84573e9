//! Claude Code History (cchist)
//!
//! Rebuilds conversations from Claude Code JSONL session logs and renders the
//! file changes each turn made as line diffs with character-level highlights.
//!
//! The pipeline is linear: [`source`] reads lines, [`parser`] turns each into
//! an [`model::Event`] or a diagnostic, [`assembler`] groups events into
//! conversation pairs, [`diff`] builds line diffs, and [`present`] renders the
//! result as text or JSON.

pub mod assembler;
pub mod config;
pub mod diff;
pub mod logging;
pub mod model;
pub mod parser;
pub mod present;
pub mod source;

pub use assembler::{assemble, ConversationPair};
pub use diff::{diff, diff_from_patch, DiffLine};

#[cfg(test)]
mod tests;
