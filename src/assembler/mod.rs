//! Conversation assembly.
//!
//! Groups the flat event sequence into [`ConversationPair`]s: one per
//! assistant response, each tied to the user message that opened its turn
//! and to the tool-result carriers that directly follow it.
//!
//! Assembly is a single forward pass over the event slice and never fails.
//! Structural anomalies (a turn with no response, carriers before any
//! response, unknown record kinds) are skipped silently.

use crate::model::{Event, ToolCall, ToolResult};
use serde::Serialize;

/// One assistant response together with its context.
///
/// Pairs borrow from the event slice they were assembled from.
/// Invariant: `tool_results` is the contiguous run of tool-result carriers
/// that immediately follows `assistant_response` in the log.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConversationPair<'a> {
    /// Event that opened the turn
    pub user_message: &'a Event,
    /// One assistant response within the turn
    pub assistant_response: &'a Event,
    /// Carriers following the response
    pub tool_results: &'a [Event],
}

impl<'a> ConversationPair<'a> {
    /// Result carried for `call`, if any.
    pub fn resolve(&self, call: &ToolCall) -> Option<&'a ToolResult> {
        resolve_tool_result(self, call)
    }
}

#[derive(Debug, Clone, Copy)]
enum State<'a> {
    SeekingTurn,
    InTurn { user: &'a Event },
}

/// Lazy iterator over the pairs of an event slice.
///
/// # Examples
///
/// ```
/// use cchist::assembler::ConversationAssembler;
/// use cchist::source::EventStore;
///
/// let log = EventStore::load_str(concat!(
///     r#"{"type":"user","message":{"role":"user","content":"hi"}}"#, "\n",
///     r#"{"type":"assistant","message":{"role":"assistant","content":"hello"}}"#, "\n",
/// ));
/// let pairs: Vec<_> = ConversationAssembler::new(&log.events).collect();
/// assert_eq!(pairs.len(), 1);
/// assert_eq!(pairs[0].user_message.message().text(), "hi");
/// ```
#[derive(Debug, Clone)]
pub struct ConversationAssembler<'a> {
    events: &'a [Event],
    pos: usize,
    state: State<'a>,
}

impl<'a> ConversationAssembler<'a> {
    /// Start assembling at the beginning of `events`.
    pub fn new(events: &'a [Event]) -> Self {
        Self {
            events,
            pos: 0,
            state: State::SeekingTurn,
        }
    }

    /// Length of the carrier run starting at `start`.
    fn carrier_run(&self, start: usize) -> usize {
        self.events[start..]
            .iter()
            .take_while(|event| event.is_tool_result_carrier())
            .count()
    }
}

impl<'a> Iterator for ConversationAssembler<'a> {
    type Item = ConversationPair<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(event) = self.events.get(self.pos) {
            match self.state {
                State::SeekingTurn => {
                    self.pos += 1;
                    if event.is_user_turn() {
                        self.state = State::InTurn { user: event };
                    }
                }
                State::InTurn { .. } if event.is_user_turn() => {
                    // Left unconsumed; it opens the next turn
                    self.state = State::SeekingTurn;
                }
                State::InTurn { user } if event.is_assistant() => {
                    let run_start = self.pos + 1;
                    let run_end = run_start + self.carrier_run(run_start);
                    self.pos = run_end;
                    return Some(ConversationPair {
                        user_message: user,
                        assistant_response: event,
                        tool_results: &self.events[run_start..run_end],
                    });
                }
                State::InTurn { .. } => self.pos += 1,
            }
        }
        None
    }
}

/// Assemble every pair of `events`, in log order.
pub fn assemble(events: &[Event]) -> Vec<ConversationPair<'_>> {
    let pairs: Vec<_> = ConversationAssembler::new(events).collect();
    tracing::debug!(events = events.len(), pairs = pairs.len(), "Assembled conversation");
    pairs
}

/// First carrier of `pair` answering `call`.
///
/// Returns `None` when no carrier in the pair's run matches the call id.
pub fn resolve_tool_result<'a>(
    pair: &ConversationPair<'a>,
    call: &ToolCall,
) -> Option<&'a ToolResult> {
    pair.tool_results
        .iter()
        .find(|carrier| carrier.tool_use_id() == Some(call.id()))
        .and_then(Event::tool_result)
}
