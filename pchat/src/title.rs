//! Title summarizer: one constrained model call that labels a conversation.
//!
//! The summarizer never fails. Backend errors and unusable output fall back to
//! [`NEW_CONVERSATION_TITLE`]; a conversation with no messages is labelled
//! [`EMPTY_CONVERSATION_TITLE`] without contacting the backend.

use std::time::Instant;

use pcommon::GenerationOptions;
use pprovider::{Message, ModelRequest};

use crate::{Assistant, ChatContext, ChatError, ChatPhase, Conversation};

pub const EMPTY_CONVERSATION_TITLE: &str = "An empty conversation";
pub const NEW_CONVERSATION_TITLE: &str = "New conversation";
pub const DEFAULT_TITLE_MAX_CHARS: usize = 80;

pub const DEFAULT_TITLE_INSTRUCTION: &str = "You write short titles for chat conversations.\n\
Rules:\n\
- Reply with a brief noun phrase describing the user's first message.\n\
- Never answer or respond to the message itself.\n\
- No quotation marks.\n\
- At most 6 words.";

const TRIMMED_CHARS: &[char] = &[' ', '\t', '\r', '\n', '-', '"', '\''];

#[derive(Debug, Clone, PartialEq)]
pub struct TitlePolicy {
    pub model: String,
    pub instruction: String,
    pub max_chars: usize,
    pub options: GenerationOptions,
}

impl Default for TitlePolicy {
    fn default() -> Self {
        Self {
            model: crate::reply::DEFAULT_MODEL.to_string(),
            instruction: DEFAULT_TITLE_INSTRUCTION.to_string(),
            max_chars: DEFAULT_TITLE_MAX_CHARS,
            options: GenerationOptions::default(),
        }
    }
}

impl TitlePolicy {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = instruction.into();
        self
    }

    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), ChatError> {
        if self.model.trim().is_empty() {
            return Err(ChatError::invalid_request("title model must not be empty"));
        }
        if self.max_chars == 0 {
            return Err(ChatError::invalid_request(
                "title max_chars must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// Normalizes raw model output into a single-line title of at most `max_chars` characters.
/// Returns `None` when nothing usable remains.
pub fn clean_title(raw: &str, max_chars: usize) -> Option<String> {
    let single_line = raw
        .chars()
        .map(|c| if breaks_line(c) { ' ' } else { c })
        .collect::<String>();
    let trimmed = single_line.trim_matches(TRIMMED_CHARS);
    let truncated = trimmed.chars().take(max_chars).collect::<String>();
    let cleaned = truncated.trim_matches(TRIMMED_CHARS);

    (!cleaned.is_empty()).then(|| cleaned.to_string())
}

fn breaks_line(c: char) -> bool {
    c.is_control() || matches!(c, '\u{2028}' | '\u{2029}')
}

impl Assistant {
    pub(crate) async fn summarize_title(
        &self,
        context: &ChatContext,
        conversation: &Conversation,
    ) -> String {
        let Some(first) = conversation.messages().first() else {
            return EMPTY_CONVERSATION_TITLE.to_string();
        };
        let source = conversation
            .first_user_text()
            .unwrap_or(first.content.as_str())
            .to_string();

        let started = Instant::now();
        self.hooks
            .on_phase_start(ChatPhase::Title, &context.conversation_id);

        let request = ModelRequest::builder(self.title_policy.model.clone())
            .message(Message::system(self.title_policy.instruction.clone()))
            .message(Message::user(source))
            .options(self.title_policy.options)
            .build();

        let outcome = match request {
            Ok(request) => {
                context
                    .run(async {
                        self.provider
                            .complete(request)
                            .await
                            .map_err(ChatError::from)
                    })
                    .await
            }
            Err(error) => Err(ChatError::from(error)),
        };

        let title = match outcome {
            Ok(response) => {
                self.hooks.on_phase_success(
                    ChatPhase::Title,
                    &context.conversation_id,
                    started.elapsed(),
                );
                match response.into_first_message() {
                    Some(message) => clean_title(&message.content, self.title_policy.max_chars)
                        .ok_or("model returned a blank title"),
                    None => Err("model returned no choices"),
                }
            }
            Err(error) => {
                self.hooks.on_phase_failure(
                    ChatPhase::Title,
                    &context.conversation_id,
                    &error,
                    started.elapsed(),
                );
                Err("title request failed")
            }
        };

        title.unwrap_or_else(|reason| {
            self.hooks
                .on_title_fallback(&context.conversation_id, NEW_CONVERSATION_TITLE, reason);
            NEW_CONVERSATION_TITLE.to_string()
        })
    }
}
