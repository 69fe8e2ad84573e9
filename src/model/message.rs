//! Message types for Claude Code log entries.
//!
//! Types represent the structure of messages exchanged during sessions.
//! Content is a closed sum type; tool inputs stay an open JSON map and are
//! interpreted by consumers that know the tool.

use crate::model::ToolUseId;
use serde::{Deserialize, Serialize};

// ===== Role =====

/// Message role in a Claude Code conversation.
///
/// Identifies who authored a message in the JSONL log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Message authored by the user, or a tool result relayed on their behalf
    User,
    /// Message authored by the assistant
    Assistant,
}

// ===== MessageContent =====

/// Content of a message in the Claude Code log format.
///
/// Messages can be either plain text (simple user messages) or structured
/// blocks (assistant messages containing text, tool calls, results, and thinking).
/// Sum type ensures exactly one representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    /// Plain text content (typically user messages)
    Text(String),
    /// Structured content blocks (assistant messages with tool use)
    Blocks(Vec<ContentBlock>),
}

impl Default for MessageContent {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

// ===== ContentBlock =====

/// Individual content block within a structured message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Text block containing markdown-formatted output
    Text {
        /// Markdown content visible to the user
        text: String,
    },
    /// Tool invocation by the assistant
    ToolUse(ToolCall),
    /// Result returned from a tool execution
    ToolResult {
        /// ID linking this result to the originating tool_use
        tool_use_id: ToolUseId,
        /// Tool output flattened to text (stdout, file contents, etc.)
        content: String,
        /// Whether the tool execution failed
        #[serde(default)]
        is_error: bool,
    },
    /// Extended thinking block
    Thinking {
        /// Reasoning content, not shown by default
        thinking: String,
    },
    /// Any block type this crate does not model (images, documents, ...)
    #[serde(other)]
    Unknown,
}

// ===== ToolCall =====

/// Tool invocation recorded in a Claude Code log.
///
/// Represents the assistant calling a tool (Read, Write, Bash, etc.) with
/// structured parameters. The id links to a corresponding tool result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique identifier for this tool invocation
    id: ToolUseId,
    /// Tool being invoked (Read, Bash, Grep, etc.)
    name: ToolName,
    /// Tool-specific parameters as JSON
    #[serde(default)]
    input: serde_json::Value,
}

impl ToolCall {
    /// Create a new tool call.
    ///
    /// Smart constructor for building tool calls during parsing or testing.
    pub fn new(id: ToolUseId, name: ToolName, input: serde_json::Value) -> Self {
        Self { id, name, input }
    }

    /// Unique identifier linking this call to its result
    pub fn id(&self) -> &ToolUseId {
        &self.id
    }

    /// Tool name (Read, Write, Bash, etc.)
    pub fn name(&self) -> &ToolName {
        &self.name
    }

    /// Tool-specific input parameters
    pub fn input(&self) -> &serde_json::Value {
        &self.input
    }

    /// String-valued input argument, if present.
    pub fn input_str(&self, key: &str) -> Option<&str> {
        self.input.get(key).and_then(serde_json::Value::as_str)
    }
}

// ===== ToolName =====

/// Tool names recognized in Claude Code logs.
///
/// Enumerates known tools with a fallback variant for custom or future
/// tools. An unrecognized name is kept verbatim and still flows through
/// assembly and rendering, only without tool-specific detail.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ToolName {
    /// Read files from filesystem
    Read,
    /// Write files to filesystem
    Write,
    /// Edit existing files (string replacement)
    Edit,
    /// Apply multiple edits atomically
    MultiEdit,
    /// Execute bash commands
    Bash,
    /// Search file contents with regex
    Grep,
    /// Find files by glob pattern
    Glob,
    /// Create or manage subagent tasks
    Task,
    /// Read the session todo list
    TodoRead,
    /// Replace the session todo list
    TodoWrite,
    /// Search the web
    WebSearch,
    /// Fetch web resources
    WebFetch,
    /// Unknown or custom tool
    Other(String),
}

impl ToolName {
    /// Parse a tool name from the JSONL log.
    ///
    /// Recognizes standard Claude Code tools, wrapping unknown names in `Other`.
    pub fn parse(name: &str) -> Self {
        match name {
            "Read" => Self::Read,
            "Write" => Self::Write,
            "Edit" => Self::Edit,
            "MultiEdit" => Self::MultiEdit,
            "Bash" => Self::Bash,
            "Grep" => Self::Grep,
            "Glob" => Self::Glob,
            "Task" => Self::Task,
            "TodoRead" => Self::TodoRead,
            "TodoWrite" => Self::TodoWrite,
            "WebSearch" => Self::WebSearch,
            "WebFetch" => Self::WebFetch,
            other => Self::Other(other.to_string()),
        }
    }

    /// Get the canonical string representation.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Read => "Read",
            Self::Write => "Write",
            Self::Edit => "Edit",
            Self::MultiEdit => "MultiEdit",
            Self::Bash => "Bash",
            Self::Grep => "Grep",
            Self::Glob => "Glob",
            Self::Task => "Task",
            Self::TodoRead => "TodoRead",
            Self::TodoWrite => "TodoWrite",
            Self::WebSearch => "WebSearch",
            Self::WebFetch => "WebFetch",
            Self::Other(s) => s,
        }
    }

    /// True for tools whose input records a before/after text replacement.
    pub fn is_file_edit(&self) -> bool {
        matches!(self, Self::Edit | Self::MultiEdit)
    }
}

impl From<String> for ToolName {
    fn from(name: String) -> Self {
        Self::parse(&name)
    }
}

impl From<ToolName> for String {
    fn from(name: ToolName) -> Self {
        name.as_str().to_string()
    }
}

// ===== Message =====

/// Complete message carried by one log record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Who authored this message (User or Assistant)
    role: Role,
    /// Message content (text or structured blocks)
    content: MessageContent,
    /// Model identifier (e.g., "claude-opus-4-5-20251101")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    model: Option<String>,
}

impl Message {
    /// Create a new message with role and content.
    ///
    /// Use `with_model()` to add the optional model identifier.
    pub fn new(role: Role, content: MessageContent) -> Self {
        Self {
            role,
            content,
            model: None,
        }
    }

    /// Message author role
    pub fn role(&self) -> Role {
        self.role
    }

    /// Message content (text or blocks)
    pub fn content(&self) -> &MessageContent {
        &self.content
    }

    /// Model that generated this message (if assistant)
    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    /// Attach a model identifier to this message (builder pattern).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Extract all tool calls from this message, in content order.
    pub fn tool_calls(&self) -> Vec<&ToolCall> {
        match &self.content {
            MessageContent::Text(_) => vec![],
            MessageContent::Blocks(blocks) => blocks
                .iter()
                .filter_map(|block| match block {
                    ContentBlock::ToolUse(call) => Some(call),
                    _ => None,
                })
                .collect(),
        }
    }

    /// Text items of this message in order.
    ///
    /// Plain text content yields a single item.
    pub fn text_items(&self) -> Vec<&str> {
        match &self.content {
            MessageContent::Text(text) => vec![text.as_str()],
            MessageContent::Blocks(blocks) => blocks
                .iter()
                .filter_map(|block| match block {
                    ContentBlock::Text { text } => Some(text.as_str()),
                    _ => None,
                })
                .collect(),
        }
    }

    /// Get text content, joining all text blocks with newlines.
    ///
    /// Returns empty string if no text blocks present.
    pub fn text(&self) -> String {
        self.text_items().join("\n")
    }

    /// First tool result block of this message, if any.
    ///
    /// Returns `(tool_use_id, content, is_error)`.
    pub fn first_tool_result(&self) -> Option<(&ToolUseId, &str, bool)> {
        match &self.content {
            MessageContent::Text(_) => None,
            MessageContent::Blocks(blocks) => blocks.iter().find_map(|block| match block {
                ContentBlock::ToolResult {
                    tool_use_id,
                    content,
                    is_error,
                } => Some((tool_use_id, content.as_str(), *is_error)),
                _ => None,
            }),
        }
    }
}

// ===== Tests =====
