//! Conversation storage contracts and a basic in-memory implementation.

use std::collections::HashMap;
use std::sync::Mutex;

use pcommon::ConversationId;

use crate::{ChatError, ChatFuture, Conversation};

/// Durable home for conversations. Identity is opaque to the store.
pub trait ConversationStore: Send + Sync {
    /// Inserts or replaces the conversation under its id.
    fn save<'a>(&'a self, conversation: Conversation) -> ChatFuture<'a, Result<(), ChatError>>;

    fn get<'a>(
        &'a self,
        conversation_id: &'a ConversationId,
    ) -> ChatFuture<'a, Result<Option<Conversation>, ChatError>>;

    /// All conversations, most recently updated first.
    fn list<'a>(&'a self) -> ChatFuture<'a, Result<Vec<Conversation>, ChatError>>;
}

#[derive(Debug, Default)]
pub struct InMemoryConversationStore {
    conversations: Mutex<HashMap<ConversationId, Conversation>>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<ConversationId, Conversation>>, ChatError> {
        self.conversations
            .lock()
            .map_err(|_| ChatError::store("conversation store lock poisoned"))
    }
}

impl ConversationStore for InMemoryConversationStore {
    fn save<'a>(&'a self, conversation: Conversation) -> ChatFuture<'a, Result<(), ChatError>> {
        Box::pin(async move {
            let mut conversations = self.lock()?;
            conversations.insert(conversation.id().clone(), conversation);
            Ok(())
        })
    }

    fn get<'a>(
        &'a self,
        conversation_id: &'a ConversationId,
    ) -> ChatFuture<'a, Result<Option<Conversation>, ChatError>> {
        Box::pin(async move { Ok(self.lock()?.get(conversation_id).cloned()) })
    }

    fn list<'a>(&'a self) -> ChatFuture<'a, Result<Vec<Conversation>, ChatError>> {
        Box::pin(async move {
            let mut conversations = self.lock()?.values().cloned().collect::<Vec<_>>();
            conversations.sort_by(|left, right| {
                right
                    .updated_at()
                    .cmp(&left.updated_at())
                    .then_with(|| left.id().cmp(right.id()))
            });
            Ok(conversations)
        })
    }
}
