//! Small convenience constructors for common types.

use crate::{
    ContinueConversationRequest, ConversationId, Message, StartConversationRequest,
};

pub fn system_message(content: impl Into<String>) -> Message {
    Message::system(content)
}

pub fn user_message(content: impl Into<String>) -> Message {
    Message::user(content)
}

pub fn assistant_message(content: impl Into<String>) -> Message {
    Message::assistant(content)
}

pub fn tool_message(tool_call_id: impl Into<String>, content: impl Into<String>) -> Message {
    Message::tool(tool_call_id, content)
}

pub fn start_request(message: impl Into<String>) -> StartConversationRequest {
    StartConversationRequest::new(message)
}

pub fn continue_request(
    conversation_id: impl Into<ConversationId>,
    message: impl Into<String>,
) -> ContinueConversationRequest {
    ContinueConversationRequest::new(conversation_id, message)
}
