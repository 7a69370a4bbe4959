//! Conversational orchestration over model providers and tools.
//!
//! [`Assistant`] implements two operations over a conversation snapshot: a bounded
//! tool-calling reply loop and a single-shot title summarizer. [`Coordinator`] runs
//! both concurrently and persists the merged result through a [`ConversationStore`];
//! [`ChatServer`] exposes the start/continue/describe/list surface on top.

mod assistant;
mod context;
mod coordinator;
mod error;
mod hooks;
mod reply;
mod server;
mod store;
mod title;
mod types;

pub mod prelude {
    pub use crate::{
        Assistant, AssistantBuilder, ChatContext, ChatError, ChatErrorKind, ChatErrorPhase,
        ChatFuture, ChatPhase, ChatRuntimeHooks, ChatServer, ContinueConversationRequest,
        ContinueConversationResponse, CoordinatedTurn, Conversation, ConversationAssistant,
        ConversationStore, Coordinator, InMemoryConversationStore, NoopChatRuntimeHooks,
        ReplyPolicy, StartConversationRequest, StartConversationResponse, TitlePolicy,
    };
    pub use pcommon::{ConversationId, MetadataMap, TraceId};
    pub use ptooling::{
        DefaultToolRuntime, Tool, ToolError, ToolErrorKind, ToolExecutionContext,
        ToolExecutionResult, ToolRegistry, ToolRuntime,
    };
}

pub use assistant::{Assistant, AssistantBuilder, ChatFuture, ConversationAssistant};
pub use context::ChatContext;
pub use coordinator::{CoordinatedTurn, Coordinator, UNTITLED_CONVERSATION_TITLE};
pub use error::{ChatError, ChatErrorKind, ChatErrorPhase};
pub use hooks::{ChatPhase, ChatRuntimeHooks, NoopChatRuntimeHooks};
pub use reply::{
    DEFAULT_MAX_TOOL_ROUNDS, DEFAULT_MODEL, DEFAULT_SYSTEM_PROMPT, ReplyPolicy,
    TOOL_ROUND_LIMIT_MESSAGE, tool_failure_message,
};
pub use server::{
    ChatServer, ContinueConversationRequest, ContinueConversationResponse,
    DescribeConversationResponse, ListConversationsResponse, StartConversationRequest,
    StartConversationResponse,
};
pub use store::{ConversationStore, InMemoryConversationStore};
pub use title::{
    DEFAULT_TITLE_INSTRUCTION, DEFAULT_TITLE_MAX_CHARS, EMPTY_CONVERSATION_TITLE,
    NEW_CONVERSATION_TITLE, TitlePolicy, clean_title,
};
pub use types::Conversation;
pub use pcommon::{ConversationId, MetadataMap, TraceId};
