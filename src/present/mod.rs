//! Presentation of assembled conversations.
//!
//! [`Transcript::build`] turns conversation pairs into plain view structs
//! that know nothing about output formats. A [`Renderer`] then writes a
//! transcript in one concrete format.

use crate::assembler::ConversationPair;
use crate::diff::DiffOptions;
use crate::model::{Diagnostic, Event, MessageContent, ToolCall};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::{self, Write};

mod json;
mod plain;
mod sanitize;
mod tools;

pub use json::JsonRenderer;
pub use plain::{PlainRenderer, DEFAULT_SHELL_PREVIEW_LINES};
#[cfg(test)]
pub(crate) use plain::format_diff_line;
pub use sanitize::strip_ansi;
pub use tools::{edit_pairs, shell_command, tool_label, TodoItem, ToolOutcome};

/// Marker of client-injected slash command text in user messages.
const COMMAND_MESSAGE_MARKER: &str = "<command-message>";

/// Writes a transcript in one output format.
pub trait Renderer {
    /// Render `transcript` to `out`.
    ///
    /// # Errors
    ///
    /// Returns any error from writing to `out`.
    fn render(&self, transcript: &Transcript, out: &mut dyn Write) -> io::Result<()>;
}

/// Options that shape a transcript.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Options for diffs recovered from edit tool input
    pub diff: DiffOptions,
}

/// The user message that opened a turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserView {
    /// Visible message text, escapes stripped
    pub text: String,
    /// When the message was sent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// One tool invocation and what it produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolView {
    /// Tool use id
    pub id: String,
    /// Tool name as recorded
    pub name: String,
    /// Short label, e.g. `Read(main.rs)`
    pub label: String,
    /// Shell command, for `Bash`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// Interpreted result
    pub outcome: ToolOutcome,
}

impl ToolView {
    fn from_call(pair: &ConversationPair<'_>, call: &ToolCall, options: &RenderOptions) -> Self {
        Self {
            id: call.id().to_string(),
            name: call.name().as_str().to_string(),
            label: tool_label(call),
            command: shell_command(call),
            outcome: ToolOutcome::from_call(call, pair.resolve(call), &options.diff),
        }
    }
}

/// One assistant response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairView {
    /// Opening user message; set on the first response of a turn only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserView>,
    /// Model that wrote the response
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// When the response was recorded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Cost of the response in USD
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_usd: Option<f64>,
    /// Duration of the response in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<f64>,
    /// Response text blocks joined by blank lines
    pub text: String,
    /// Tool invocations in content order
    pub tools: Vec<ToolView>,
}

/// A whole conversation ready to render.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Transcript {
    /// One view per conversation pair
    pub pairs: Vec<PairView>,
    /// Skipped log lines
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

impl Transcript {
    /// Build views for `pairs`.
    ///
    /// The user message is attached to the first pair of each turn and
    /// omitted when it is a client-injected meta message or has no visible
    /// text.
    pub fn build(pairs: &[ConversationPair<'_>], options: &RenderOptions) -> Self {
        let mut previous_user: Option<&Event> = None;
        let views = pairs
            .iter()
            .map(|pair| {
                let new_turn =
                    previous_user.is_none_or(|prev| !std::ptr::eq(prev, pair.user_message));
                previous_user = Some(pair.user_message);
                PairView {
                    user: new_turn.then(|| user_view(pair.user_message)).flatten(),
                    model: pair.assistant_response.message().model().map(str::to_string),
                    timestamp: pair.assistant_response.timestamp(),
                    cost_usd: pair.assistant_response.metadata().cost_usd,
                    duration_ms: pair.assistant_response.metadata().duration_ms,
                    text: assistant_text(pair.assistant_response),
                    tools: pair
                        .assistant_response
                        .message()
                        .tool_calls()
                        .into_iter()
                        .map(|call| ToolView::from_call(pair, call, options))
                        .collect(),
                }
            })
            .collect();

        Self {
            pairs: views,
            diagnostics: Vec::new(),
        }
    }

    /// Attach the diagnostics of the load that produced the events.
    pub fn with_diagnostics(mut self, diagnostics: Vec<Diagnostic>) -> Self {
        self.diagnostics = diagnostics;
        self
    }
}

fn user_view(event: &Event) -> Option<UserView> {
    if event.metadata().is_meta {
        return None;
    }
    let text = match event.message().content() {
        MessageContent::Text(text) => strip_ansi(text).into_owned(),
        MessageContent::Blocks(_) => event
            .message()
            .text_items()
            .into_iter()
            .filter(|text| !text.contains(COMMAND_MESSAGE_MARKER))
            .map(|text| strip_ansi(text).into_owned())
            .collect::<Vec<_>>()
            .join("\n"),
    };
    let text = text.trim();
    (!text.is_empty()).then(|| UserView {
        text: text.to_string(),
        timestamp: event.timestamp(),
    })
}

fn assistant_text(event: &Event) -> String {
    event
        .message()
        .text_items()
        .into_iter()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(|text| strip_ansi(text).into_owned())
        .collect::<Vec<_>>()
        .join("\n\n")
}
