use super::ids::{EventId, InvocationId};
use super::serde_utils::blank_as_none;
use serde::{Deserialize, Serialize};

/// One entry of a conversation feed.
/// Wire tag follows the agent service's message types: `human`, `ai`, `tool`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ConversationEvent {
    #[serde(rename = "human")]
    HumanTurn(HumanTurn),
    #[serde(rename = "ai")]
    AssistantTurn(AssistantTurn),
    #[serde(rename = "tool")]
    ToolResult(ToolResult),
}

impl ConversationEvent {
    pub fn id(&self) -> &EventId {
        match self {
            ConversationEvent::HumanTurn(turn) => &turn.id,
            ConversationEvent::AssistantTurn(turn) => &turn.id,
            ConversationEvent::ToolResult(result) => &result.id,
        }
    }

    pub fn as_assistant(&self) -> Option<&AssistantTurn> {
        match self {
            ConversationEvent::AssistantTurn(turn) => Some(turn),
            _ => None,
        }
    }

    pub fn as_tool_result(&self) -> Option<&ToolResult> {
        match self {
            ConversationEvent::ToolResult(result) => Some(result),
            _ => None,
        }
    }

    pub fn is_assistant(&self) -> bool {
        matches!(self, ConversationEvent::AssistantTurn(_))
    }

    pub fn kind_label(&self) -> &'static str {
        match self {
            ConversationEvent::HumanTurn(_) => "human",
            ConversationEvent::AssistantTurn(_) => "ai",
            ConversationEvent::ToolResult(_) => "tool",
        }
    }
}

impl From<HumanTurn> for ConversationEvent {
    fn from(turn: HumanTurn) -> Self {
        ConversationEvent::HumanTurn(turn)
    }
}

impl From<AssistantTurn> for ConversationEvent {
    fn from(turn: AssistantTurn) -> Self {
        ConversationEvent::AssistantTurn(turn)
    }
}

impl From<ToolResult> for ConversationEvent {
    fn from(result: ToolResult) -> Self {
        ConversationEvent::ToolResult(result)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HumanTurn {
    pub id: EventId,
    #[serde(rename = "content", default)]
    pub text: String,
}

impl HumanTurn {
    pub fn new(id: impl Into<EventId>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssistantTurn {
    pub id: EventId,
    #[serde(rename = "content", default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(rename = "tool_calls", default)]
    pub invocations: Vec<ToolInvocation>,
    #[serde(rename = "invalid_tool_calls", default)]
    pub malformed_invocations: Vec<MalformedInvocation>,
}

impl AssistantTurn {
    pub fn new(id: impl Into<EventId>) -> Self {
        Self {
            id: id.into(),
            text: None,
            invocations: Vec::new(),
            malformed_invocations: Vec::new(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_invocation(mut self, invocation: ToolInvocation) -> Self {
        self.invocations.push(invocation);
        self
    }

    pub fn with_malformed(mut self, malformed: MalformedInvocation) -> Self {
        self.malformed_invocations.push(malformed);
        self
    }

    /// True if this turn declares an id-bearing invocation with the given id.
    pub fn declares(&self, id: &InvocationId) -> bool {
        self.invocations
            .iter()
            .any(|inv| inv.id.as_ref() == Some(id))
    }

    pub fn has_malformed(&self) -> bool {
        !self.malformed_invocations.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolInvocation {
    /// Absent ids can never be matched to a result.
    #[serde(default, with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub id: Option<InvocationId>,
    #[serde(default)]
    pub name: String,
}

impl ToolInvocation {
    pub fn new(id: impl Into<InvocationId>, name: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: name.into(),
        }
    }

    pub fn anonymous(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }
}

/// A tool call the transport flagged as unusable (bad arguments, no id, ...).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MalformedInvocation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "error", default, skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
}

impl MalformedInvocation {
    pub fn new(name: Option<String>, error_description: Option<String>) -> Self {
        Self {
            name,
            error_description,
        }
    }

    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or("Unknown Tool")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolResult {
    pub id: EventId,
    #[serde(
        rename = "tool_call_id",
        default,
        with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub invocation_id: Option<InvocationId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub status: ToolStatus,
    #[serde(rename = "content", default)]
    pub text: String,
}

impl ToolResult {
    pub fn new(id: impl Into<EventId>, status: ToolStatus, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            invocation_id: None,
            name: None,
            status,
            text: text.into(),
        }
    }

    pub fn for_invocation(mut self, invocation_id: impl Into<InvocationId>) -> Self {
        self.invocation_id = Some(invocation_id.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ToolStatus {
    Pending,
    #[default]
    Success,
    Error,
}
