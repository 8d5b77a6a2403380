pub mod event;
pub mod ids;
pub mod serde_utils;
pub mod theme;
pub mod thread;

pub use event::{
    AssistantTurn, ConversationEvent, HumanTurn, MalformedInvocation, ToolInvocation, ToolResult,
    ToolStatus,
};
pub use ids::{EventId, InvocationId, ThreadId};
pub use theme::Theme;
pub use thread::{normalize_title, ThreadRecord, DEFAULT_THREAD_TITLE};
