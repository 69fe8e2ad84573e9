//! JSONL parser for Claude Code log records.
//!
//! This module provides pure parsing functions for converting JSONL lines
//! into validated [`Event`] structs.

use crate::model::{
    ContentBlock, Diagnostic, EntryUuid, Event, EventKind, EventMetadata, Message, MessageContent,
    ParseError, Role, SessionId, ToolCall, ToolName, ToolResult, ToolUseId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use std::path::PathBuf;
use tracing::{debug, warn};

// Entry type string constants
const ENTRY_TYPE_USER: &str = "user";
const ENTRY_TYPE_ASSISTANT: &str = "assistant";
const ENTRY_TYPE_SUMMARY: &str = "summary";

// Role string constants
const ROLE_USER: &str = "user";

/// Raw JSON structure for deserializing log records.
///
/// Only `type` is required. Everything else is optional so that records from
/// older or newer clients still parse.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLogEntry {
    #[serde(rename = "type")]
    entry_type: Option<String>,
    #[serde(default)]
    message: Option<RawMessage>,
    #[serde(default)]
    uuid: Option<String>,
    #[serde(default, alias = "session_id")]
    session_id: Option<String>,
    #[serde(default)]
    timestamp: Option<serde_json::Value>,
    #[serde(default)]
    cwd: Option<String>,
    #[serde(default)]
    git_branch: Option<String>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    is_sidechain: Option<bool>,
    #[serde(default)]
    is_meta: Option<bool>,
    #[serde(default, rename = "costUSD")]
    cost_usd: Option<f64>,
    #[serde(default)]
    duration_ms: Option<f64>,
    // Key presence marks a tool-result carrier, even when the value is null.
    #[serde(default, deserialize_with = "present_value")]
    tool_use_result: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RawMessage {
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    content: Option<RawMessageContent>,
    #[serde(default)]
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawMessageContent {
    Text(String),
    // Decoded per item in parse_content_block
    Blocks(Vec<serde_json::Value>),
    Other(serde_json::Value),
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum RawContentBlock {
    Text {
        #[serde(default)]
        text: Option<String>,
    },
    ToolUse {
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        input: serde_json::Value,
    },
    ToolResult {
        #[serde(default)]
        tool_use_id: Option<String>,
        #[serde(default)]
        content: serde_json::Value,
        #[serde(default)]
        is_error: Option<bool>,
    },
    Thinking {
        #[serde(default)]
        thinking: Option<String>,
    },
    #[serde(other)]
    Unknown,
}

/// Deserialize a field whose presence matters more than its value.
fn present_value<'de, D>(deserializer: D) -> Result<Option<serde_json::Value>, D::Error>
where
    D: Deserializer<'de>,
{
    serde_json::Value::deserialize(deserializer).map(Some)
}

/// Result of parsing a JSONL line with graceful error handling.
///
/// This allows the caller to continue processing subsequent lines
/// even when encountering malformed JSON.
#[derive(Debug, Clone)]
pub enum ParseResult {
    /// Successfully parsed a valid event.
    Valid(Box<Event>),
    /// Encountered a malformed line that could not be parsed.
    Malformed(Diagnostic),
}

/// Parse a single JSONL line gracefully.
///
/// Unlike `parse_event()`, this function never returns an error.
/// Instead, it returns either a valid Event or a Diagnostic describing
/// why the line was rejected.
///
/// # Arguments
///
/// * `raw` - The raw JSONL line to parse
/// * `line_number` - The line number (1-indexed) for error reporting
pub fn parse_event_graceful(raw: &str, line_number: usize) -> ParseResult {
    match parse_event(raw, line_number) {
        Ok(event) => ParseResult::Valid(Box::new(event)),
        Err(parse_error) => ParseResult::Malformed(Diagnostic::from_parse_error(raw, &parse_error)),
    }
}

/// Parse a single JSONL line into an Event.
///
/// This is the main entry point for parsing. It:
/// - Deserializes the JSON
/// - Classifies the record (user / assistant / tool-result carrier / summary / other)
/// - Constructs validated newtypes
/// - Returns a fully validated Event
///
/// # Errors
///
/// Returns `ParseError` if the JSON is malformed or not an object, or the
/// `type` field is missing. Unreadable timestamps and content items are
/// dropped without rejecting the record.
pub fn parse_event(raw: &str, line_number: usize) -> Result<Event, ParseError> {
    let raw_entry: RawLogEntry =
        serde_json::from_str(raw).map_err(|e| ParseError::InvalidJson {
            line: line_number,
            message: e.to_string(),
        })?;

    let entry_type = raw_entry
        .entry_type
        .as_deref()
        .ok_or(ParseError::MissingField {
            line: line_number,
            field: "type",
        })?;
    let kind = parse_event_kind(entry_type, raw_entry.tool_use_result.is_some());

    let timestamp = raw_entry
        .timestamp
        .as_ref()
        .and_then(|ts| parse_timestamp(ts, line_number));

    let message = match raw_entry.message {
        Some(raw_msg) => parse_message(raw_msg, &kind, line_number),
        None => Message::new(default_role(&kind), MessageContent::default()),
    };

    let metadata = EventMetadata {
        cost_usd: raw_entry.cost_usd,
        duration_ms: raw_entry.duration_ms,
        is_meta: raw_entry.is_meta.unwrap_or(false),
        is_sidechain: raw_entry.is_sidechain.unwrap_or(false),
        cwd: raw_entry.cwd.map(PathBuf::from),
        git_branch: raw_entry.git_branch,
        version: raw_entry.version,
    };

    let mut event = Event::new(line_number, kind, message).with_metadata(metadata);

    // Empty identifiers are treated as absent rather than rejecting the record
    if let Some(uuid) = raw_entry.uuid.and_then(|u| EntryUuid::new(u).ok()) {
        event = event.with_uuid(uuid);
    }
    if let Some(session_id) = raw_entry.session_id.and_then(|s| SessionId::new(s).ok()) {
        event = event.with_session_id(session_id);
    }
    if let Some(timestamp) = timestamp {
        event = event.with_timestamp(timestamp);
    }

    if event.kind() == &EventKind::ToolResultCarrier {
        let payload = raw_entry.tool_use_result.unwrap_or_default();
        let (tool_use_id, result) = match event.message().first_tool_result() {
            Some((id, output, is_error)) => (
                Some(id.clone()),
                ToolResult::new(payload).with_output(output, is_error),
            ),
            None => (None, ToolResult::new(payload)),
        };
        event = event.with_tool_result(tool_use_id, result);
    }

    Ok(event)
}

/// Classify a record from its `type` string and carrier marker.
fn parse_event_kind(type_str: &str, has_tool_result: bool) -> EventKind {
    match type_str {
        ENTRY_TYPE_USER if has_tool_result => EventKind::ToolResultCarrier,
        ENTRY_TYPE_USER => EventKind::User,
        ENTRY_TYPE_ASSISTANT => EventKind::Assistant,
        ENTRY_TYPE_SUMMARY => EventKind::Summary,
        other => EventKind::Other(other.to_string()),
    }
}

fn default_role(kind: &EventKind) -> Role {
    match kind {
        EventKind::User | EventKind::ToolResultCarrier => Role::User,
        _ => Role::Assistant,
    }
}

/// An unreadable timestamp is dropped; the record itself is kept.
fn parse_timestamp(raw: &serde_json::Value, line_number: usize) -> Option<DateTime<Utc>> {
    match raw.as_str().map(str::parse::<DateTime<Utc>>) {
        Some(Ok(timestamp)) => Some(timestamp),
        _ => {
            warn!(line = line_number, raw = %raw, "Ignoring unparseable timestamp");
            None
        }
    }
}

/// Parse a raw message into a Message.
fn parse_message(raw: RawMessage, kind: &EventKind, line_number: usize) -> Message {
    let role = match raw.role.as_deref() {
        Some(ROLE_USER) => Role::User,
        Some(_) => Role::Assistant,
        None => default_role(kind),
    };

    let content = match raw.content {
        None | Some(RawMessageContent::Other(_)) => MessageContent::default(),
        Some(RawMessageContent::Text(text)) => MessageContent::Text(text),
        Some(RawMessageContent::Blocks(items)) => MessageContent::Blocks(
            items
                .into_iter()
                .map(|item| parse_content_block(item, line_number))
                .collect(),
        ),
    };

    let message = Message::new(role, content);
    match raw.model {
        Some(model) => message.with_model(model),
        None => message,
    }
}

/// Parse one content item into a ContentBlock.
///
/// Items that cannot be read, including tool items without an id, become
/// `ContentBlock::Unknown`.
fn parse_content_block(item: serde_json::Value, line_number: usize) -> ContentBlock {
    let raw = match serde_json::from_value::<RawContentBlock>(item) {
        Ok(raw) => raw,
        Err(e) => {
            debug!(line = line_number, error = %e, "Unreadable content item");
            return ContentBlock::Unknown;
        }
    };

    match raw {
        RawContentBlock::Text { text } => ContentBlock::Text {
            text: text.unwrap_or_default(),
        },
        RawContentBlock::ToolUse { id, name, input } => {
            let Some(id) = id.and_then(|id| ToolUseId::new(id).ok()) else {
                debug!(line = line_number, "Tool use without id");
                return ContentBlock::Unknown;
            };
            ContentBlock::ToolUse(ToolCall::new(
                id,
                ToolName::parse(name.as_deref().unwrap_or_default()),
                input,
            ))
        }
        RawContentBlock::ToolResult {
            tool_use_id,
            content,
            is_error,
        } => {
            let Some(tool_use_id) = tool_use_id.and_then(|id| ToolUseId::new(id).ok()) else {
                debug!(line = line_number, "Tool result without tool_use_id");
                return ContentBlock::Unknown;
            };
            ContentBlock::ToolResult {
                tool_use_id,
                content: flatten_tool_result_content(&content),
                is_error: is_error.unwrap_or(false),
            }
        }
        RawContentBlock::Thinking { thinking } => ContentBlock::Thinking {
            thinking: thinking.unwrap_or_default(),
        },
        RawContentBlock::Unknown => ContentBlock::Unknown,
    }
}

/// Tool result content is either a string or a list of text items.
fn flatten_tool_result_content(content: &serde_json::Value) -> String {
    match content {
        serde_json::Value::String(text) => text.clone(),
        serde_json::Value::Array(items) => items
            .iter()
            .filter_map(|item| item.get("text").and_then(serde_json::Value::as_str))
            .collect::<Vec<_>>()
            .join("\n"),
        _ => String::new(),
    }
}
