//! Transport-agnostic conversation service.
//!
//! Each operation validates its request before any conversation is created or loaded,
//! so rejected input never reaches the coordinator or the store.
//!
//! ```rust
//! use pchat::{ChatErrorKind, StartConversationRequest};
//!
//! let request = StartConversationRequest::new("   ");
//! let error = request.validate().expect_err("blank input is rejected");
//! assert_eq!(error.kind, ChatErrorKind::InvalidRequest);
//! ```

use std::sync::Arc;
use std::time::Duration;

use pcommon::{ConversationId, TraceId};
use pprovider::Message;

use crate::{ChatContext, ChatError, ChatErrorPhase, Conversation, ConversationStore, Coordinator};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartConversationRequest {
    pub message: String,
    pub trace_id: Option<TraceId>,
}

impl StartConversationRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            trace_id: None,
        }
    }

    pub fn with_trace_id(mut self, trace_id: impl Into<TraceId>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    pub fn validate(&self) -> Result<(), ChatError> {
        validate_message(&self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartConversationResponse {
    pub conversation_id: ConversationId,
    pub title: String,
    pub reply: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContinueConversationRequest {
    pub conversation_id: ConversationId,
    pub message: String,
    pub trace_id: Option<TraceId>,
}

impl ContinueConversationRequest {
    pub fn new(conversation_id: impl Into<ConversationId>, message: impl Into<String>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            message: message.into(),
            trace_id: None,
        }
    }

    pub fn with_trace_id(mut self, trace_id: impl Into<TraceId>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    pub fn validate(&self) -> Result<(), ChatError> {
        validate_conversation_id(&self.conversation_id)?;
        validate_message(&self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContinueConversationResponse {
    pub reply: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DescribeConversationResponse {
    pub conversation: Conversation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListConversationsResponse {
    pub conversations: Vec<Conversation>,
}

#[derive(Clone)]
pub struct ChatServer {
    coordinator: Coordinator,
    store: Arc<dyn ConversationStore>,
    turn_timeout: Option<Duration>,
}

impl ChatServer {
    pub fn new(coordinator: Coordinator) -> Self {
        Self {
            store: coordinator.store(),
            coordinator,
            turn_timeout: None,
        }
    }

    /// Upper bound for a whole turn; in-flight model and tool calls are abandoned once it
    /// elapses.
    pub fn with_turn_timeout(mut self, timeout: Duration) -> Self {
        self.turn_timeout = Some(timeout);
        self
    }

    pub async fn start_conversation(
        &self,
        request: StartConversationRequest,
    ) -> Result<StartConversationResponse, ChatError> {
        request.validate()?;

        let conversation = Conversation::start(request.message);
        let context = self.context(conversation.id().clone(), request.trace_id);
        let turn = self.coordinator.start_turn(&context, conversation).await?;

        Ok(StartConversationResponse {
            conversation_id: turn.conversation.id().clone(),
            title: turn.title,
            reply: turn.reply,
        })
    }

    pub async fn continue_conversation(
        &self,
        request: ContinueConversationRequest,
    ) -> Result<ContinueConversationResponse, ChatError> {
        request.validate()?;

        let mut conversation = self.load(&request.conversation_id).await?;
        conversation.push(Message::user(request.message));

        let context = self.context(request.conversation_id, request.trace_id);
        let turn = self.coordinator.continue_turn(&context, conversation).await?;

        Ok(ContinueConversationResponse { reply: turn.reply })
    }

    pub async fn describe_conversation(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<DescribeConversationResponse, ChatError> {
        validate_conversation_id(conversation_id)?;
        let conversation = self.load(conversation_id).await?;
        Ok(DescribeConversationResponse { conversation })
    }

    pub async fn list_conversations(&self) -> Result<ListConversationsResponse, ChatError> {
        let conversations = self
            .store
            .list()
            .await
            .map_err(|error| error.with_phase(ChatErrorPhase::Persistence))?;
        Ok(ListConversationsResponse { conversations })
    }

    async fn load(&self, conversation_id: &ConversationId) -> Result<Conversation, ChatError> {
        self.store
            .get(conversation_id)
            .await
            .map_err(|error| error.with_phase(ChatErrorPhase::Persistence))?
            .ok_or_else(|| {
                ChatError::not_found(format!("conversation '{conversation_id}' not found"))
                    .with_phase(ChatErrorPhase::Validation)
            })
    }

    fn context(&self, conversation_id: ConversationId, trace_id: Option<TraceId>) -> ChatContext {
        let mut context = ChatContext::new(conversation_id);
        if let Some(trace_id) = trace_id {
            context = context.with_trace_id(trace_id);
        }
        if let Some(timeout) = self.turn_timeout {
            context = context.with_timeout(timeout);
        }
        context
    }
}

fn validate_message(message: &str) -> Result<(), ChatError> {
    if message.trim().is_empty() {
        return Err(ChatError::invalid_request("message must not be empty")
            .with_phase(ChatErrorPhase::Validation));
    }
    Ok(())
}

fn validate_conversation_id(conversation_id: &ConversationId) -> Result<(), ChatError> {
    if conversation_id.as_str().trim().is_empty() {
        return Err(ChatError::invalid_request("conversation_id must not be empty")
            .with_phase(ChatErrorPhase::Validation));
    }
    Ok(())
}
