//! Per-tool interpretation of tool results.
//!
//! Tool payloads are free-form JSON whose shape depends on the tool. This
//! module reads the fields each known tool records and falls back to a
//! generic outcome for everything else.

use super::sanitize::strip_ansi;
use crate::diff::{DiffOptions, FileDiff, PatchHunk};
use crate::model::{ToolCall, ToolName, ToolResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

const UNKNOWN_FILE: &str = "Unknown";

/// What a tool invocation produced, ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ToolOutcome {
    /// Shell output lines; empty when the command printed nothing
    Shell {
        /// Output split into lines, escapes stripped
        lines: Vec<String>,
    },
    /// A file was written
    Created {
        /// Base name of the written file
        file_name: String,
        /// Lines written, when the content was recorded
        line_count: Option<usize>,
    },
    /// A file was edited
    Modified {
        /// Base name of the edited file
        file_name: String,
        /// Line diff, when one could be recovered
        diff: Option<FileDiff>,
    },
    /// A file was read
    Read {
        /// Base name of the read file
        file_name: String,
        /// Number of lines read
        line_count: usize,
    },
    /// The todo list was shown or replaced
    Todos {
        /// True for a replacement (`TodoWrite`)
        updated: bool,
        /// Items in list order
        items: Vec<TodoItem>,
    },
    /// The tool reported an error
    Failed {
        /// Error text, escapes stripped
        message: String,
    },
    /// Generic placeholder for tools without specific detail
    Completed,
}

/// One todo list entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    /// Entry text
    #[serde(default)]
    pub content: String,
    /// Status string as recorded (`pending`, `in_progress`, `completed`)
    #[serde(default)]
    pub status: String,
}

impl TodoItem {
    /// Whether the entry is done.
    pub fn is_completed(&self) -> bool {
        self.status == "completed"
    }
}

impl ToolOutcome {
    /// Interpret the result of `call`.
    ///
    /// `result` is `None` when no carrier answered the call; editing tools
    /// then fall back to a diff of their input.
    pub fn from_call(call: &ToolCall, result: Option<&ToolResult>, options: &DiffOptions) -> Self {
        let Some(result) = result else {
            return match call.name() {
                name if name.is_file_edit() => modified(call, None, options),
                _ => Self::Completed,
            };
        };

        if result.is_error() {
            return Self::Failed {
                message: error_message(result),
            };
        }

        match call.name() {
            ToolName::TodoRead => Self::Todos {
                updated: false,
                items: todo_items(match result.payload() {
                    list @ serde_json::Value::Array(_) => Some(list),
                    other => other.get("todos"),
                }),
            },
            _ if !result.payload().is_object() => Self::Completed,
            ToolName::Bash => shell(result),
            ToolName::Write => created(call, result),
            name if name.is_file_edit() => modified(call, Some(result), options),
            ToolName::Read => read(result),
            ToolName::TodoWrite => Self::Todos {
                updated: true,
                items: todo_items(result.get("newTodos")),
            },
            _ => Self::Completed,
        }
    }
}

/// Short label for the invocation, e.g. `Read(main.rs)`.
pub fn tool_label(call: &ToolCall) -> String {
    let name = call.name().as_str();
    match call.name() {
        ToolName::Write | ToolName::Edit | ToolName::MultiEdit | ToolName::Read => {
            format!("{name}({})", file_name(call.input_str("file_path")))
        }
        ToolName::Glob | ToolName::Grep => {
            format!("{name}({})", strip_ansi(call.input_str("pattern").unwrap_or_default()))
        }
        ToolName::TodoWrite => {
            let count = call
                .input()
                .get("todos")
                .and_then(serde_json::Value::as_array)
                .map_or(0, Vec::len);
            format!("{name}({count} items)")
        }
        _ => name.to_string(),
    }
}

/// Shell command of a `Bash` invocation.
pub fn shell_command(call: &ToolCall) -> Option<String> {
    match call.name() {
        ToolName::Bash => call
            .input_str("command")
            .filter(|command| !command.is_empty())
            .map(|command| strip_ansi(command).into_owned()),
        _ => None,
    }
}

fn file_name(path: Option<&str>) -> String {
    path.filter(|p| !p.is_empty())
        .and_then(|p| Path::new(p).file_name())
        .map_or_else(
            || UNKNOWN_FILE.to_string(),
            |name| name.to_string_lossy().into_owned(),
        )
}

fn shell(result: &ToolResult) -> ToolOutcome {
    let stdout = result.get_str("stdout").unwrap_or_default().trim();
    let stderr = result.get_str("stderr").unwrap_or_default().trim();
    let output = if stdout.is_empty() { stderr } else { stdout };

    let lines = if output.is_empty() {
        Vec::new()
    } else {
        strip_ansi(output).split('\n').map(str::to_string).collect()
    };
    ToolOutcome::Shell { lines }
}

fn created(call: &ToolCall, result: &ToolResult) -> ToolOutcome {
    let path = result.get_str("filePath").or_else(|| call.input_str("file_path"));
    let line_count = result
        .get_str("content")
        .filter(|content| !content.is_empty())
        .map(|content| content.split('\n').count());
    ToolOutcome::Created {
        file_name: file_name(path),
        line_count,
    }
}

fn modified(call: &ToolCall, result: Option<&ToolResult>, options: &DiffOptions) -> ToolOutcome {
    let path = result
        .and_then(|r| r.get_str("filePath"))
        .or_else(|| call.input_str("file_path"));

    let hunks: Vec<PatchHunk> = result
        .and_then(|r| r.get("structuredPatch"))
        .and_then(|patch| serde_json::from_value(patch.clone()).ok())
        .unwrap_or_default();

    let diff = if hunks.is_empty() {
        Some(FileDiff::from_edits(edit_pairs(call), options)).filter(|d| !d.is_empty())
    } else {
        Some(FileDiff::from_patch(&hunks))
    };

    ToolOutcome::Modified {
        file_name: file_name(path),
        diff,
    }
}

/// `(old_string, new_string)` replacements recorded in an edit tool input.
///
/// `Edit` records one replacement at the top level; `MultiEdit` records a
/// list under `edits`.
pub fn edit_pairs(call: &ToolCall) -> Vec<(&str, &str)> {
    fn pair(value: &serde_json::Value) -> Option<(&str, &str)> {
        let old = value.get("old_string")?.as_str()?;
        let new = value.get("new_string")?.as_str()?;
        Some((old, new))
    }

    match call.input().get("edits").and_then(serde_json::Value::as_array) {
        Some(edits) => edits.iter().filter_map(pair).collect(),
        None => pair(call.input()).into_iter().collect(),
    }
}

fn read(result: &ToolResult) -> ToolOutcome {
    let file = result.get("file");
    let line_count = file
        .and_then(|f| f.get("numLines"))
        .and_then(serde_json::Value::as_u64)
        .map_or(0, |n| usize::try_from(n).unwrap_or(usize::MAX));
    let path = file
        .and_then(|f| f.get("filePath"))
        .and_then(serde_json::Value::as_str);
    ToolOutcome::Read {
        file_name: file_name(path),
        line_count,
    }
}

fn todo_items(value: Option<&serde_json::Value>) -> Vec<TodoItem> {
    value
        .and_then(serde_json::Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| TodoItem::deserialize(item).ok())
                .map(|item| TodoItem {
                    content: strip_ansi(&item.content).into_owned(),
                    ..item
                })
                .collect()
        })
        .unwrap_or_default()
}

fn error_message(result: &ToolResult) -> String {
    let text = result
        .output()
        .filter(|output| !output.trim().is_empty())
        .or_else(|| result.payload().as_str())
        .unwrap_or("Error");
    strip_ansi(text.trim()).into_owned()
}
