//! The assistant seam used by the coordinator and its default model-backed implementation.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use pprovider::ModelProvider;
use ptooling::{DefaultToolRuntime, ToolRegistry, ToolRuntime};

use crate::{
    ChatContext, ChatError, ChatRuntimeHooks, Conversation, NoopChatRuntimeHooks, ReplyPolicy,
    TitlePolicy,
};

pub type ChatFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Produces a title and a reply for a conversation snapshot. Neither operation mutates
/// the conversation.
pub trait ConversationAssistant: Send + Sync {
    fn title<'a>(
        &'a self,
        context: &'a ChatContext,
        conversation: &'a Conversation,
    ) -> ChatFuture<'a, Result<String, ChatError>>;

    fn reply<'a>(
        &'a self,
        context: &'a ChatContext,
        conversation: &'a Conversation,
    ) -> ChatFuture<'a, Result<String, ChatError>>;
}

/// Model-backed assistant: a single-shot title summarizer and a bounded tool-calling
/// reply loop sharing one provider.
#[derive(Clone)]
pub struct Assistant {
    pub(crate) provider: Arc<dyn ModelProvider>,
    pub(crate) tools: Arc<dyn ToolRuntime>,
    pub(crate) reply_policy: ReplyPolicy,
    pub(crate) title_policy: TitlePolicy,
    pub(crate) hooks: Arc<dyn ChatRuntimeHooks>,
}

impl Assistant {
    pub fn builder(provider: Arc<dyn ModelProvider>) -> AssistantBuilder {
        AssistantBuilder::new(provider)
    }

    pub fn reply_policy(&self) -> &ReplyPolicy {
        &self.reply_policy
    }

    pub fn title_policy(&self) -> &TitlePolicy {
        &self.title_policy
    }

    pub fn tool_runtime(&self) -> Arc<dyn ToolRuntime> {
        Arc::clone(&self.tools)
    }
}

impl std::fmt::Debug for Assistant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Assistant")
            .field("provider", &self.provider.id())
            .field("tools", &self.tools.registry())
            .field("reply_policy", &self.reply_policy)
            .field("title_policy", &self.title_policy)
            .finish_non_exhaustive()
    }
}

impl ConversationAssistant for Assistant {
    fn title<'a>(
        &'a self,
        context: &'a ChatContext,
        conversation: &'a Conversation,
    ) -> ChatFuture<'a, Result<String, ChatError>> {
        Box::pin(async move { Ok(self.summarize_title(context, conversation).await) })
    }

    fn reply<'a>(
        &'a self,
        context: &'a ChatContext,
        conversation: &'a Conversation,
    ) -> ChatFuture<'a, Result<String, ChatError>> {
        Box::pin(self.generate_reply(context, conversation))
    }
}

pub struct AssistantBuilder {
    provider: Arc<dyn ModelProvider>,
    tools: Option<Arc<dyn ToolRuntime>>,
    reply_policy: ReplyPolicy,
    title_policy: TitlePolicy,
    hooks: Arc<dyn ChatRuntimeHooks>,
}

impl AssistantBuilder {
    pub fn new(provider: Arc<dyn ModelProvider>) -> Self {
        Self {
            provider,
            tools: None,
            reply_policy: ReplyPolicy::default(),
            title_policy: TitlePolicy::default(),
            hooks: Arc::new(NoopChatRuntimeHooks),
        }
    }

    /// Dispatch through a [`DefaultToolRuntime`] over `registry`.
    pub fn tool_registry(self, registry: Arc<ToolRegistry>) -> Self {
        self.tool_runtime(Arc::new(DefaultToolRuntime::new(registry)))
    }

    pub fn tool_runtime(mut self, runtime: Arc<dyn ToolRuntime>) -> Self {
        self.tools = Some(runtime);
        self
    }

    pub fn reply_policy(mut self, policy: ReplyPolicy) -> Self {
        self.reply_policy = policy;
        self
    }

    pub fn title_policy(mut self, policy: TitlePolicy) -> Self {
        self.title_policy = policy;
        self
    }

    pub fn hooks(mut self, hooks: Arc<dyn ChatRuntimeHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn build(self) -> Result<Assistant, ChatError> {
        self.reply_policy.validate()?;
        self.title_policy.validate()?;

        let tools = self
            .tools
            .unwrap_or_else(|| Arc::new(DefaultToolRuntime::default()) as Arc<dyn ToolRuntime>);
        self.hooks
            .on_tools_registered(&tools.registry().definitions());

        Ok(Assistant {
            provider: self.provider,
            tools,
            reply_policy: self.reply_policy,
            title_policy: self.title_policy,
            hooks: self.hooks,
        })
    }
}
