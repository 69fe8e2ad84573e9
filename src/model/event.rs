//! Event types representing parsed JSONL records.
//!
//! An [`Event`] is one conversational record of the log, in log order.
//! All fields are validated at construction time by the parser; after that
//! events are read-only.

use crate::model::{EntryUuid, Message, SessionId, ToolUseId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ===== EventKind =====

/// Kind of log record - exactly one variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// New human input; opens a turn
    User,
    /// One assistant response block
    Assistant,
    /// A `user` record carrying the outcome of an earlier tool invocation
    ToolResultCarrier,
    /// Session summary record; never returned by the event store
    Summary,
    /// Any other record type, keyed by its `type` string
    Other(String),
}

impl EventKind {
    /// True for `user` records that are not tool-result carriers.
    pub fn opens_turn(&self) -> bool {
        matches!(self, Self::User)
    }
}

// ===== EventMetadata =====

/// Per-record bookkeeping that does not affect assembly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventMetadata {
    /// Cost of the response in USD
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_usd: Option<f64>,
    /// Wall-clock duration of the response in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<f64>,
    /// Injected by the client rather than typed by the user
    #[serde(default)]
    pub is_meta: bool,
    /// Recorded on a sidechain (subagent) branch
    #[serde(default)]
    pub is_sidechain: bool,
    /// Working directory of the session
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<PathBuf>,
    /// Git branch checked out when the record was written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_branch: Option<String>,
    /// Client version that wrote the record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

// ===== ToolResult =====

/// Outcome of one tool invocation, as carried by a tool-result carrier.
///
/// The payload is the free-form `toolUseResult` object; its shape depends
/// on the tool and is interpreted by consumers that know the tool name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    payload: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    output: Option<String>,
    #[serde(default)]
    is_error: bool,
}

impl ToolResult {
    /// Create a tool result from its raw payload.
    pub fn new(payload: serde_json::Value) -> Self {
        Self {
            payload,
            output: None,
            is_error: false,
        }
    }

    /// Attach the text of the matching `tool_result` content block.
    pub fn with_output(mut self, output: impl Into<String>, is_error: bool) -> Self {
        self.output = Some(output.into());
        self.is_error = is_error;
        self
    }

    /// Raw `toolUseResult` payload.
    pub fn payload(&self) -> &serde_json::Value {
        &self.payload
    }

    /// Payload field by key (`None` if the payload is not an object).
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.payload.get(key)
    }

    /// String payload field by key.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(serde_json::Value::as_str)
    }

    /// Text of the `tool_result` content block, if one was recorded.
    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    /// Whether the tool reported failure.
    pub fn is_error(&self) -> bool {
        self.is_error
    }
}

// ===== Event =====

/// A parsed conversational record from the JSONL log.
/// Invariant: `tool_use_id` and `tool_result` are only set on carriers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    line_number: usize,
    kind: EventKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    uuid: Option<EntryUuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    session_id: Option<SessionId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timestamp: Option<DateTime<Utc>>,
    message: Message,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_use_id: Option<ToolUseId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_result: Option<ToolResult>,
    #[serde(default)]
    metadata: EventMetadata,
}

impl Event {
    /// Create a new event with no optional fields set.
    ///
    /// Use the `with_*` builders to attach the rest; the parser goes through
    /// the same path.
    pub fn new(line_number: usize, kind: EventKind, message: Message) -> Self {
        Self {
            line_number,
            kind,
            uuid: None,
            session_id: None,
            timestamp: None,
            message,
            tool_use_id: None,
            tool_result: None,
            metadata: EventMetadata::default(),
        }
    }

    /// Attach the record UUID.
    pub fn with_uuid(mut self, uuid: EntryUuid) -> Self {
        self.uuid = Some(uuid);
        self
    }

    /// Attach the session identifier.
    pub fn with_session_id(mut self, session_id: SessionId) -> Self {
        self.session_id = Some(session_id);
        self
    }

    /// Attach the record timestamp.
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Attach a tool result, turning this event into a carrier.
    ///
    /// `tool_use_id` is `None` when the record carries a payload but no
    /// `tool_result` content block; such a carrier never resolves.
    pub fn with_tool_result(mut self, tool_use_id: Option<ToolUseId>, result: ToolResult) -> Self {
        self.kind = EventKind::ToolResultCarrier;
        self.tool_use_id = tool_use_id;
        self.tool_result = Some(result);
        self
    }

    /// Attach record metadata.
    pub fn with_metadata(mut self, metadata: EventMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    // ===== Accessors (read-only) =====

    /// 1-based line of this record in the source log.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Record kind.
    pub fn kind(&self) -> &EventKind {
        &self.kind
    }

    /// Record UUID, if the log carried one.
    pub fn uuid(&self) -> Option<&EntryUuid> {
        self.uuid.as_ref()
    }

    /// Session identifier, if the log carried one.
    pub fn session_id(&self) -> Option<&SessionId> {
        self.session_id.as_ref()
    }

    /// Record timestamp, if the log carried one.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }

    /// Message carried by the record.
    pub fn message(&self) -> &Message {
        &self.message
    }

    /// Tool use this carrier answers.
    pub fn tool_use_id(&self) -> Option<&ToolUseId> {
        self.tool_use_id.as_ref()
    }

    /// Carried tool result.
    pub fn tool_result(&self) -> Option<&ToolResult> {
        self.tool_result.as_ref()
    }

    /// Record metadata.
    pub fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }

    /// True for a `user` record that opens a turn.
    pub fn is_user_turn(&self) -> bool {
        self.kind.opens_turn()
    }

    /// True for an assistant response.
    pub fn is_assistant(&self) -> bool {
        self.kind == EventKind::Assistant
    }

    /// True for a tool-result carrier.
    pub fn is_tool_result_carrier(&self) -> bool {
        self.kind == EventKind::ToolResultCarrier
    }
}

// ===== Tests =====
