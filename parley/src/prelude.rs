//! Common imports for most parley applications.

pub use crate::{
    ParleyConfig, ProviderBuildConfig, RuntimeBundle, RuntimeOptions, assistant_message,
    build_openai_provider, build_runtime, build_runtime_from_config, build_runtime_with,
    build_tool_registry, continue_request, start_request, system_message, tool_message,
    user_message,
};
pub use crate::{parley_conversation, parley_messages, parley_msg};
pub use crate::{
    Assistant, ChatContext, ChatError, ChatErrorKind, ChatErrorPhase, ChatServer,
    ContinueConversationRequest, Conversation, ConversationId, ConversationStore, Coordinator,
    DefaultToolRuntime, InMemoryConversationStore, Message, ModelProvider, ModelRequest,
    ProviderError, ProviderId, ReplyPolicy, Role, SecretString, StartConversationRequest,
    TitlePolicy, Tool, ToolCall, ToolDefinition, ToolError, ToolExecutionContext, ToolRegistry,
    ToolRuntime, TracingObservabilityHooks,
};
