//! Association of tool results with the assistant turns that requested them.
//!
//! Everything here is a pure function of an immutable event snapshot. Callers
//! re-run it on every render; nothing is cached or persisted.

pub mod plan;

pub use plan::{
    build_render_plan, expandable_keys, expandable_outputs, ExpansionKey, RenderItem, ToolView,
};

use std::collections::BTreeMap;

use crate::error::ResolveError;
use crate::model::{AssistantTurn, ConversationEvent, InvocationId, ToolResult, ToolStatus};

/// Display state of one invocation.
///
/// Transitions `Pending -> Resolved` exactly once, on the first matching
/// result after the declaring turn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution<'a> {
    Pending,
    Resolved(&'a ToolResult),
}

impl<'a> Resolution<'a> {
    pub fn is_pending(&self) -> bool {
        matches!(self, Resolution::Pending)
    }

    pub fn result(&self) -> Option<&'a ToolResult> {
        match self {
            Resolution::Pending => None,
            Resolution::Resolved(result) => Some(result),
        }
    }

    /// Status shown in the UI: the attributed result's status, or pending.
    pub fn status(&self) -> ToolStatus {
        self.result()
            .map(|result| result.status)
            .unwrap_or(ToolStatus::Pending)
    }
}

/// Invocation id -> resolution, for one assistant turn.
pub type ResultMap<'a> = BTreeMap<InvocationId, Resolution<'a>>;

/// Resolve the results for every id-bearing invocation of the assistant turn
/// at `assistant_index`.
///
/// Scans forward from the turn, taking the first result per id, and stops
/// once every id is resolved or the next assistant turn is reached. Every
/// declared id is present in the returned map.
pub fn resolve_tool_results(
    events: &[ConversationEvent],
    assistant_index: usize,
) -> Result<ResultMap<'_>, ResolveError> {
    let turn = assistant_at(events, assistant_index)?;
    Ok(resolve_for_turn(events, assistant_index, turn))
}

/// Whether the tool result at `index` is already shown inline under the
/// assistant turn directly before it.
///
/// Only the adjacent case is suppressed; a result separated from its turn by
/// other events is still rendered on its own.
pub fn should_suppress(events: &[ConversationEvent], index: usize) -> bool {
    let Some(ConversationEvent::ToolResult(result)) = events.get(index) else {
        return false;
    };
    let Some(invocation_id) = result.invocation_id.as_ref() else {
        return false;
    };

    index
        .checked_sub(1)
        .and_then(|prev| events.get(prev))
        .and_then(ConversationEvent::as_assistant)
        .is_some_and(|turn| turn.declares(invocation_id))
}

/// Whether the agent still owes a response for this snapshot: the last event
/// is a human turn, or the latest assistant turn has id-bearing invocations
/// with no result yet.
///
/// Id-less invocations can never resolve, so they do not keep a thread busy.
pub fn awaiting_response(events: &[ConversationEvent]) -> bool {
    match events.last() {
        None => false,
        Some(ConversationEvent::HumanTurn(_)) => true,
        Some(_) => events
            .iter()
            .rposition(ConversationEvent::is_assistant)
            .and_then(|index| resolve_tool_results(events, index).ok())
            .is_some_and(|results| results.values().any(Resolution::is_pending)),
    }
}

fn assistant_at(events: &[ConversationEvent], index: usize) -> Result<&AssistantTurn, ResolveError> {
    let event = events.get(index).ok_or(ResolveError::IndexOutOfBounds {
        index,
        len: events.len(),
    })?;

    event.as_assistant().ok_or(ResolveError::NotAssistantTurn {
        index,
        kind: event.kind_label(),
    })
}

pub(crate) fn resolve_for_turn<'a>(
    events: &'a [ConversationEvent],
    index: usize,
    turn: &AssistantTurn,
) -> ResultMap<'a> {
    // Id-less invocations never enter the map.
    let mut results: ResultMap<'a> = turn
        .invocations
        .iter()
        .filter_map(|inv| inv.id.clone())
        .map(|id| (id, Resolution::Pending))
        .collect();

    let mut unresolved = results.len();
    if unresolved == 0 {
        return results;
    }

    for event in &events[index + 1..] {
        match event {
            ConversationEvent::AssistantTurn(_) => break,
            ConversationEvent::HumanTurn(_) => {}
            ConversationEvent::ToolResult(result) => {
                let Some(id) = result.invocation_id.as_ref() else {
                    continue;
                };
                if let Some(slot) = results.get_mut(id) {
                    if slot.is_pending() {
                        *slot = Resolution::Resolved(result);
                        unresolved -= 1;
                        if unresolved == 0 {
                            break;
                        }
                    }
                }
            }
        }
    }

    results
}
