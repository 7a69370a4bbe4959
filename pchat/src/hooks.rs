//! Runtime hooks for title, reply, and coordinated turn lifecycle events.
//!
//! ```rust
//! use pchat::{ChatRuntimeHooks, NoopChatRuntimeHooks};
//!
//! fn assert_hooks_trait(_hooks: &dyn ChatRuntimeHooks) {}
//!
//! assert_hooks_trait(&NoopChatRuntimeHooks);
//! ```

use std::time::Duration;

use pcommon::ConversationId;
use pprovider::ToolDefinition;

use crate::ChatError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChatPhase {
    Title,
    Reply,
    Turn,
}

impl ChatPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Reply => "reply",
            Self::Turn => "turn",
        }
    }
}

pub trait ChatRuntimeHooks: Send + Sync {
    /// Reported once when an assistant is built with its tool catalog.
    fn on_tools_registered(&self, _tools: &[ToolDefinition]) {}

    fn on_phase_start(&self, _phase: ChatPhase, _conversation_id: &ConversationId) {}

    fn on_phase_success(
        &self,
        _phase: ChatPhase,
        _conversation_id: &ConversationId,
        _elapsed: Duration,
    ) {
    }

    fn on_phase_failure(
        &self,
        _phase: ChatPhase,
        _conversation_id: &ConversationId,
        _error: &ChatError,
        _elapsed: Duration,
    ) {
    }

    fn on_title_fallback(&self, _conversation_id: &ConversationId, _title: &str, _reason: &str) {}

    fn on_reply_round(&self, _conversation_id: &ConversationId, _round: usize, _tool_calls: usize) {
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopChatRuntimeHooks;

impl ChatRuntimeHooks for NoopChatRuntimeHooks {}
