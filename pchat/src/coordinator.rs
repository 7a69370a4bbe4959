//! Runs the title summarizer and the reply loop side by side for one turn.
//!
//! Both operations receive the same read-only snapshot of the conversation and are
//! spawned as independent tasks, so the turn takes as long as the slower of the two.
//! The conversation is only mutated after both have finished, and it is persisted at
//! most once per turn.

use std::sync::Arc;
use std::time::Instant;

use pprovider::Message;
use tokio::task::JoinError;

use crate::{
    ChatContext, ChatError, ChatErrorPhase, ChatPhase, ChatRuntimeHooks, Conversation,
    ConversationAssistant, ConversationStore, NoopChatRuntimeHooks,
};

pub const UNTITLED_CONVERSATION_TITLE: &str = "Untitled conversation";

#[derive(Debug, Clone, PartialEq)]
pub struct CoordinatedTurn {
    pub title: String,
    pub reply: String,
    /// The conversation as persisted: titled, with the reply appended.
    pub conversation: Conversation,
}

#[derive(Clone)]
pub struct Coordinator {
    assistant: Arc<dyn ConversationAssistant>,
    store: Arc<dyn ConversationStore>,
    hooks: Arc<dyn ChatRuntimeHooks>,
}

impl Coordinator {
    pub fn new(
        assistant: Arc<dyn ConversationAssistant>,
        store: Arc<dyn ConversationStore>,
    ) -> Self {
        Self {
            assistant,
            store,
            hooks: Arc::new(NoopChatRuntimeHooks),
        }
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn ChatRuntimeHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn store(&self) -> Arc<dyn ConversationStore> {
        Arc::clone(&self.store)
    }

    /// Titles and answers `conversation` concurrently, then persists the merged result.
    ///
    /// A failed or blank title degrades to [`UNTITLED_CONVERSATION_TITLE`]. A failed reply
    /// fails the turn as `Internal` (the original kind is kept as the cause) unless the
    /// turn was cancelled, and nothing is written.
    pub async fn start_turn(
        &self,
        context: &ChatContext,
        mut conversation: Conversation,
    ) -> Result<CoordinatedTurn, ChatError> {
        let started = Instant::now();
        self.hooks
            .on_phase_start(ChatPhase::Turn, &context.conversation_id);

        let scope = context.child();
        // Dropping the turn mid-flight cancels both spawned operations.
        let guard = scope.cancellation.clone().drop_guard();
        let snapshot = Arc::new(conversation.clone());

        let title_task = {
            let assistant = Arc::clone(&self.assistant);
            let snapshot = Arc::clone(&snapshot);
            let context = scope.child();
            tokio::spawn(async move { assistant.title(&context, &snapshot).await })
        };
        let reply_task = {
            let assistant = Arc::clone(&self.assistant);
            let snapshot = Arc::clone(&snapshot);
            let context = scope.child();
            tokio::spawn(async move { assistant.reply(&context, &snapshot).await })
        };

        let (title, reply) = tokio::join!(title_task, reply_task);
        let _ = guard.disarm();

        let title = match joined(title, "title") {
            Ok(title) if !title.trim().is_empty() => title,
            _ => UNTITLED_CONVERSATION_TITLE.to_string(),
        };

        let reply = match joined(reply, "reply") {
            Ok(reply) => reply,
            Err(error) => {
                let error = reply_failure(error);
                self.hooks.on_phase_failure(
                    ChatPhase::Turn,
                    &context.conversation_id,
                    &error,
                    started.elapsed(),
                );
                return Err(error);
            }
        };

        conversation.set_title(title.clone());
        conversation.push(Message::assistant(reply.clone()));
        self.persist(context, &conversation, started).await?;

        self.hooks.on_phase_success(
            ChatPhase::Turn,
            &context.conversation_id,
            started.elapsed(),
        );
        Ok(CoordinatedTurn {
            title,
            reply,
            conversation,
        })
    }

    /// Answers the latest message of an existing conversation without retitling it.
    pub async fn continue_turn(
        &self,
        context: &ChatContext,
        mut conversation: Conversation,
    ) -> Result<CoordinatedTurn, ChatError> {
        let started = Instant::now();
        self.hooks
            .on_phase_start(ChatPhase::Turn, &context.conversation_id);

        let reply = match self.assistant.reply(context, &conversation).await {
            Ok(reply) => reply,
            Err(error) => {
                let error = reply_failure(error);
                self.hooks.on_phase_failure(
                    ChatPhase::Turn,
                    &context.conversation_id,
                    &error,
                    started.elapsed(),
                );
                return Err(error);
            }
        };

        conversation.push(Message::assistant(reply.clone()));
        self.persist(context, &conversation, started).await?;

        self.hooks.on_phase_success(
            ChatPhase::Turn,
            &context.conversation_id,
            started.elapsed(),
        );
        Ok(CoordinatedTurn {
            title: conversation.title().to_string(),
            reply,
            conversation,
        })
    }

    async fn persist(
        &self,
        context: &ChatContext,
        conversation: &Conversation,
        started: Instant,
    ) -> Result<(), ChatError> {
        if let Err(error) = self.store.save(conversation.clone()).await {
            let error = error.with_phase(ChatErrorPhase::Persistence);
            self.hooks.on_phase_failure(
                ChatPhase::Turn,
                &context.conversation_id,
                &error,
                started.elapsed(),
            );
            return Err(error);
        }
        Ok(())
    }
}

/// Caller-initiated cancellation keeps its kind; anything else is reported as internal.
fn reply_failure(error: ChatError) -> ChatError {
    let error = if error.is_cancelled() {
        error
    } else {
        error.into_internal()
    };
    error.with_phase(ChatErrorPhase::Reply)
}

fn joined(
    result: Result<Result<String, ChatError>, JoinError>,
    operation: &str,
) -> Result<String, ChatError> {
    match result {
        Ok(outcome) => outcome,
        Err(error) if error.is_cancelled() => {
            Err(ChatError::cancelled(format!("{operation} task was cancelled")))
        }
        Err(error) => Err(ChatError::internal(format!(
            "{operation} task failed: {error}"
        ))),
    }
}
