//! Core identifier newtypes with smart constructors.
//!
//! All identifiers validate non-empty strings at construction time.
//! Raw constructors are never exported - use smart constructors only.
//! Serde goes through the same validation, so a deserialized identifier
//! is always non-empty.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a log record (the `uuid` field).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntryUuid(String);

impl EntryUuid {
    /// Smart constructor: validates non-empty UUID
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidUuid> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(InvalidUuid::Empty);
        }
        Ok(Self(raw))
    }

    /// Borrow the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for EntryUuid {
    type Error = InvalidUuid;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<EntryUuid> for String {
    fn from(id: EntryUuid) -> Self {
        id.0
    }
}

/// Session identifier grouping related records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionId(String);

impl SessionId {
    /// Smart constructor: validates non-empty session ID
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidSessionId> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(InvalidSessionId::Empty);
        }
        Ok(Self(raw))
    }

    /// Borrow the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for SessionId {
    type Error = InvalidSessionId;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<SessionId> for String {
    fn from(id: SessionId) -> Self {
        id.0
    }
}

/// Tool invocation identifier linking a `tool_use` to its `tool_result`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ToolUseId(String);

impl ToolUseId {
    /// Smart constructor: validates non-empty tool use ID
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidToolUseId> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(InvalidToolUseId::Empty);
        }
        Ok(Self(raw))
    }

    /// Borrow the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ToolUseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ToolUseId {
    type Error = InvalidToolUseId;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<ToolUseId> for String {
    fn from(id: ToolUseId) -> Self {
        id.0
    }
}

// ===== Error Types =====

/// Rejected [`EntryUuid`] input.
#[derive(Debug, Clone, thiserror::Error)]
pub enum InvalidUuid {
    /// The UUID string was empty.
    #[error("UUID cannot be empty")]
    Empty,
}

/// Rejected [`SessionId`] input.
#[derive(Debug, Clone, thiserror::Error)]
pub enum InvalidSessionId {
    /// The session ID string was empty.
    #[error("Session ID cannot be empty")]
    Empty,
}

/// Rejected [`ToolUseId`] input.
#[derive(Debug, Clone, thiserror::Error)]
pub enum InvalidToolUseId {
    /// The tool use ID string was empty.
    #[error("Tool Use ID cannot be empty")]
    Empty,
}

// ===== Tests =====

#[cfg(test)]
mod tests {
    use super::*;

    // ===== EntryUuid Tests =====

    #[test]
    fn entry_uuid_accepts_valid_string() {
        let uuid = EntryUuid::new("550e8400-e29b-41d4-a716-446655440000");
        assert!(uuid.is_ok(), "Valid UUID should be accepted");
    }

    #[test]
    fn entry_uuid_rejects_empty_string() {
        let uuid = EntryUuid::new("");
        assert!(
            matches!(uuid, Err(InvalidUuid::Empty)),
            "Empty string should return InvalidUuid::Empty"
        );
    }

    #[test]
    fn entry_uuid_display_returns_inner_string() {
        let original = "550e8400-e29b-41d4-a716-446655440000";
        let uuid = EntryUuid::new(original).expect("Valid UUID");
        assert_eq!(uuid.to_string(), original);
        assert_eq!(uuid.as_str(), original);
    }

    // ===== SessionId Tests =====

    #[test]
    fn session_id_rejects_empty_string() {
        let id = SessionId::new("");
        assert!(
            matches!(id, Err(InvalidSessionId::Empty)),
            "Empty string should return InvalidSessionId::Empty"
        );
    }

    #[test]
    fn session_id_accepts_string_type() {
        let owned = String::from("session-abc");
        let id = SessionId::new(owned).expect("Valid session ID");
        assert_eq!(id.as_str(), "session-abc");
    }

    // ===== ToolUseId Tests =====

    #[test]
    fn tool_use_id_rejects_empty_string() {
        let id = ToolUseId::new("");
        assert!(
            matches!(id, Err(InvalidToolUseId::Empty)),
            "Empty string should return InvalidToolUseId::Empty"
        );
    }

    #[test]
    fn tool_use_id_display_returns_inner_string() {
        let id = ToolUseId::new("toolu_01").expect("Valid tool use ID");
        assert_eq!(id.to_string(), "toolu_01");
    }

    // ===== Serde Tests =====

    #[test]
    fn tool_use_id_serializes_as_plain_string() {
        let id = ToolUseId::new("toolu_01").expect("Valid tool use ID");
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, "\"toolu_01\"");
    }

    #[test]
    fn tool_use_id_deserialize_rejects_empty_string() {
        let result: Result<ToolUseId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err(), "Empty id must not deserialize");
    }

    #[test]
    fn session_id_deserialize_round_trips() {
        let id: SessionId = serde_json::from_str("\"s-1\"").expect("deserialize");
        assert_eq!(id.as_str(), "s-1");
    }

    // ===== Error Message Tests =====

    #[test]
    fn invalid_uuid_error_message() {
        assert_eq!(InvalidUuid::Empty.to_string(), "UUID cannot be empty");
    }

    #[test]
    fn invalid_tool_use_id_error_message() {
        assert_eq!(
            InvalidToolUseId::Empty.to_string(),
            "Tool Use ID cannot be empty"
        );
    }
}
