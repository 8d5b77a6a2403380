use super::{resolve_for_turn, should_suppress, Resolution};
use crate::model::{
    AssistantTurn, ConversationEvent, EventId, HumanTurn, InvocationId, MalformedInvocation,
    ToolInvocation, ToolResult,
};

/// One visible row group of a transcript.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderItem<'a> {
    Human(&'a HumanTurn),
    Assistant {
        turn: &'a AssistantTurn,
        tools: Vec<ToolView<'a>>,
        invalid: &'a [MalformedInvocation],
    },
    StandaloneResult(&'a ToolResult),
}

impl RenderItem<'_> {
    /// True for assistant turns carrying malformed invocations.
    pub fn has_invalid(&self) -> bool {
        matches!(self, RenderItem::Assistant { turn, .. } if turn.has_malformed())
    }
}

/// An invocation as displayed under its assistant turn.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolView<'a> {
    /// The assistant turn that declared the invocation
    pub turn_id: &'a EventId,
    pub invocation: &'a ToolInvocation,
    pub resolution: Resolution<'a>,
}

impl ToolView<'_> {
    /// Result name, then invocation name, then a generic label.
    pub fn display_name(&self) -> &str {
        self.resolution
            .result()
            .and_then(|result| result.name.as_deref())
            .filter(|name| !name.is_empty())
            .or(Some(self.invocation.name.as_str()).filter(|name| !name.is_empty()))
            .unwrap_or("Tool")
    }

    pub fn expansion_key(&self) -> Option<ExpansionKey> {
        match (&self.invocation.id, self.resolution) {
            (Some(id), Resolution::Resolved(_)) => {
                Some(ExpansionKey::invocation(self.turn_id.clone(), id.clone()))
            }
            _ => None,
        }
    }
}

/// Identifies an expandable tool output in the transcript.
///
/// Invocations are keyed per turn: two turns reusing an invocation id
/// expand independently.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ExpansionKey {
    Invocation { turn: EventId, invocation: InvocationId },
    Result(EventId),
}

impl ExpansionKey {
    pub fn invocation(turn: impl Into<EventId>, invocation: impl Into<InvocationId>) -> Self {
        ExpansionKey::Invocation {
            turn: turn.into(),
            invocation: invocation.into(),
        }
    }
}

/// Turn a feed snapshot into what the transcript shows: suppressed results
/// removed, every assistant invocation paired with its resolution.
pub fn build_render_plan(events: &[ConversationEvent]) -> Vec<RenderItem<'_>> {
    events
        .iter()
        .enumerate()
        .filter(|(index, _)| !should_suppress(events, *index))
        .map(|(index, event)| match event {
            ConversationEvent::HumanTurn(turn) => RenderItem::Human(turn),
            ConversationEvent::AssistantTurn(turn) => {
                let results = resolve_for_turn(events, index, turn);
                let tools = turn
                    .invocations
                    .iter()
                    .map(|invocation| ToolView {
                        turn_id: &turn.id,
                        invocation,
                        resolution: invocation
                            .id
                            .as_ref()
                            .and_then(|id| results.get(id).copied())
                            .unwrap_or(Resolution::Pending),
                    })
                    .collect();
                RenderItem::Assistant {
                    turn,
                    tools,
                    invalid: &turn.malformed_invocations,
                }
            }
            ConversationEvent::ToolResult(result) => RenderItem::StandaloneResult(result),
        })
        .collect()
}

/// Keys of every tool output the user can expand, in transcript order.
pub fn expandable_keys(plan: &[RenderItem<'_>]) -> Vec<ExpansionKey> {
    expandable_outputs(plan)
        .into_iter()
        .map(|(key, _)| key)
        .collect()
}

/// Expandable tool outputs paired with the result they show.
pub fn expandable_outputs<'a>(plan: &[RenderItem<'a>]) -> Vec<(ExpansionKey, &'a ToolResult)> {
    plan.iter()
        .flat_map(|item| match item {
            RenderItem::Human(_) => Vec::new(),
            RenderItem::Assistant { tools, .. } => tools
                .iter()
                .filter_map(|tool| Some((tool.expansion_key()?, tool.resolution.result()?)))
                .collect(),
            RenderItem::StandaloneResult(result) => {
                vec![(ExpansionKey::Result(result.id.clone()), *result)]
            }
        })
        .collect()
}
