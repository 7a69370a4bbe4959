//! Conversation model.
//!
//! ```rust
//! use pchat::Conversation;
//! use pprovider::Message;
//!
//! let mut conversation = Conversation::new("conv-1");
//! conversation.push(Message::user("What is the weather in Bangkok?"));
//! conversation.push(Message::assistant("Hot and humid."));
//!
//! assert_eq!(conversation.messages().len(), 2);
//! assert_eq!(conversation.first_user_text(), Some("What is the weather in Bangkok?"));
//! ```

use chrono::{DateTime, Utc};
use pcommon::ConversationId;
use pprovider::{Message, Role};

/// An ordered, append-only transcript plus a mutable title.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversation {
    id: ConversationId,
    title: String,
    messages: Vec<Message>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Conversation {
    pub fn new(id: impl Into<ConversationId>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            title: String::new(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Fresh conversation with a generated id holding one user message.
    pub fn start(user_message: impl Into<String>) -> Self {
        let mut conversation = Self::new(ConversationId::generate());
        conversation.push(Message::user(user_message));
        conversation
    }

    pub fn id(&self) -> &ConversationId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.touch();
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
        self.touch();
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// First user message with non-blank content.
    pub fn first_user_text(&self) -> Option<&str> {
        self.messages
            .iter()
            .find(|message| message.role == Role::User && !message.content.trim().is_empty())
            .map(|message| message.content.as_str())
    }

    fn touch(&mut self) {
        // Keep timestamps monotonic even if the wall clock steps backwards.
        self.updated_at = Utc::now().max(self.updated_at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_generates_id_and_single_user_message() {
        let first = Conversation::start("hello");
        let second = Conversation::start("hello");

        assert_ne!(first.id(), second.id());
        assert_eq!(first.messages(), &[Message::user("hello")]);
        assert!(first.title().is_empty());
    }

    #[test]
    fn first_user_text_skips_blank_and_non_user_messages() {
        let mut conversation = Conversation::new("conv-1");
        conversation.push(Message::assistant("Hi there"));
        conversation.push(Message::user("   "));
        conversation.push(Message::user("Plan a trip to Lisbon"));

        assert_eq!(conversation.first_user_text(), Some("Plan a trip to Lisbon"));
    }

    #[test]
    fn push_advances_updated_at() {
        let mut conversation = Conversation::new("conv-2");
        let created = conversation.updated_at();
        conversation.push(Message::user("hi"));

        assert!(conversation.updated_at() >= created);
        assert_eq!(conversation.created_at(), created);
    }
}
