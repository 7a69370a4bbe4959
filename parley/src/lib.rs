//! Unified facade over the parley workspace crates.
//!
//! This crate is designed to be the single dependency for most applications.
//! It re-exports the core parley crates and wires a ready-to-serve [`ChatServer`]
//! from environment configuration: an OpenAI-backed assistant, the built-in tools,
//! an in-memory conversation store, and tracing hooks.

mod macros;

pub mod prelude;
pub mod providers;
pub mod runtime;
pub mod util;

pub use pchat;
pub use pcommon;
pub use pobserve;
pub use pprovider;
pub use ptooling;

pub use pchat::{
    Assistant, AssistantBuilder, ChatContext, ChatError, ChatErrorKind, ChatErrorPhase,
    ChatFuture, ChatPhase, ChatRuntimeHooks, ChatServer, ContinueConversationRequest,
    ContinueConversationResponse, CoordinatedTurn, Conversation, ConversationAssistant,
    ConversationStore, Coordinator, DescribeConversationResponse, InMemoryConversationStore,
    ListConversationsResponse, NoopChatRuntimeHooks, ReplyPolicy, StartConversationRequest,
    StartConversationResponse, TitlePolicy,
};
pub use pcommon::{BoxFuture, ConversationId, GenerationOptions, MetadataMap, TraceId};
pub use pobserve::{
    MetricsObservabilityHooks, SafeChatHooks, SafeProviderHooks, SafeToolHooks,
    TracingObservabilityHooks,
};
pub use pprovider::{
    Choice, Message, ModelProvider, ModelRequest, ModelRequestBuilder, ModelResponse,
    NoopOperationHooks, ProviderError, ProviderErrorKind, ProviderFuture, ProviderId,
    ProviderOperationHooks, Role, SecretString, StopReason, TokenUsage, ToolCall,
    ToolDefinition,
};
pub use ptooling::{
    DefaultToolRuntime, FunctionTool, NoopToolRuntimeHooks, Tool, ToolArgs, ToolError,
    ToolErrorKind, ToolExecutionContext, ToolExecutionResult, ToolFuture, ToolRegistry,
    ToolRuntime, ToolRuntimeHooks, parse_json_object, parse_json_value, required_string,
};

pub use providers::{ProviderBuildConfig, build_openai_provider};
pub use runtime::{
    ParleyConfig, RuntimeBundle, RuntimeOptions, build_runtime, build_runtime_from_config,
    build_runtime_with, build_tool_registry,
};
pub use util::{
    assistant_message, continue_request, start_request, system_message, tool_message,
    user_message,
};
