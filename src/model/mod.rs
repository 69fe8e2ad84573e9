//! Domain model types (pure).
//!
//! All types in this module are pure data with smart constructors.

pub mod diagnostic;
pub mod error;
pub mod event;
pub mod identifiers;
pub mod message;

// Re-export for convenience
pub use diagnostic::Diagnostic;
pub use error::{InputError, ParseError};
pub use event::{Event, EventKind, EventMetadata, ToolResult};
pub use identifiers::{
    EntryUuid, InvalidSessionId, InvalidToolUseId, InvalidUuid, SessionId, ToolUseId,
};
pub use message::{ContentBlock, Message, MessageContent, Role, ToolCall, ToolName};
