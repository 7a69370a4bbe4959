//! Bounded tool-calling reply loop.
//!
//! Each round sends the accumulated transcript and the tool catalog to the model. A
//! response without tool calls ends the loop with its text; otherwise every requested
//! call is dispatched in order and its outcome is appended as a tool message carrying
//! the originating call id. Tool failures stay inside the transcript; only backend
//! failures, protocol violations, cancellation, and round exhaustion end the turn.

use std::time::Instant;

use pcommon::GenerationOptions;
use pprovider::{Message, ModelRequest, Role, ToolCall};
use ptooling::{ToolError, ToolErrorKind};

use crate::{Assistant, ChatContext, ChatError, ChatErrorPhase, ChatPhase, Conversation};

pub const DEFAULT_MODEL: &str = "gpt-4.1";
pub const DEFAULT_MAX_TOOL_ROUNDS: usize = 15;
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a helpful, concise AI assistant. Provide accurate, safe, and clear responses.";

pub const TOOL_ROUND_LIMIT_MESSAGE: &str = "too many tool calls, unable to generate reply";

#[derive(Debug, Clone, PartialEq)]
pub struct ReplyPolicy {
    pub model: String,
    pub system_prompt: String,
    pub max_tool_rounds: usize,
    pub options: GenerationOptions,
}

impl Default for ReplyPolicy {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
            options: GenerationOptions::default(),
        }
    }
}

impl ReplyPolicy {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    pub fn with_max_tool_rounds(mut self, max_tool_rounds: usize) -> Self {
        self.max_tool_rounds = max_tool_rounds;
        self
    }

    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), ChatError> {
        if self.model.trim().is_empty() {
            return Err(ChatError::invalid_request("reply model must not be empty"));
        }
        if self.max_tool_rounds == 0 {
            return Err(ChatError::invalid_request(
                "max_tool_rounds must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// Renders a failed tool call as the observation the model sees.
pub fn tool_failure_message(call: &ToolCall, error: &ToolError) -> String {
    match error.kind {
        ToolErrorKind::NotFound => format!("unknown tool: {}", call.name),
        ToolErrorKind::MalformedArguments => {
            format!("failed to parse tool arguments: {}", error.message)
        }
        _ => format!("tool error: {}", error.message),
    }
}

impl Assistant {
    pub(crate) async fn generate_reply(
        &self,
        context: &ChatContext,
        conversation: &Conversation,
    ) -> Result<String, ChatError> {
        if conversation.is_empty() {
            return Err(ChatError::invalid_request("conversation has no messages")
                .with_phase(ChatErrorPhase::Reply));
        }

        let started = Instant::now();
        self.hooks
            .on_phase_start(ChatPhase::Reply, &context.conversation_id);

        let result = self
            .run_tool_loop(context, conversation)
            .await
            .map_err(|error| error.with_phase(ChatErrorPhase::Reply));

        match &result {
            Ok(_) => self.hooks.on_phase_success(
                ChatPhase::Reply,
                &context.conversation_id,
                started.elapsed(),
            ),
            Err(error) => self.hooks.on_phase_failure(
                ChatPhase::Reply,
                &context.conversation_id,
                error,
                started.elapsed(),
            ),
        }

        result
    }

    async fn run_tool_loop(
        &self,
        context: &ChatContext,
        conversation: &Conversation,
    ) -> Result<String, ChatError> {
        let policy = &self.reply_policy;
        let catalog = self.tools.registry().definitions();

        let mut messages = Vec::with_capacity(conversation.messages().len() + 1);
        messages.push(Message::system(policy.system_prompt.clone()));
        messages.extend(
            conversation
                .messages()
                .iter()
                .filter(|message| message.role != Role::System)
                .cloned(),
        );

        for round in 1..=policy.max_tool_rounds {
            let request = ModelRequest::builder(policy.model.clone())
                .messages(messages.clone())
                .tools(catalog.clone())
                .options(policy.options)
                .build()?;

            let response = context
                .run(async {
                    self.provider
                        .complete(request)
                        .await
                        .map_err(ChatError::from)
                })
                .await?;

            let Some(reply) = response.into_first_message() else {
                return Err(ChatError::protocol("model returned no choices"));
            };

            if !reply.has_tool_calls() {
                return Ok(reply.content);
            }

            self.hooks
                .on_reply_round(&context.conversation_id, round, reply.tool_calls.len());

            // Text alongside tool calls is dropped; only the calls are replayed.
            let calls = reply.tool_calls;
            messages.push(Message::assistant("").with_tool_calls(calls.clone()));

            for call in calls {
                let outcome = context
                    .run(async {
                        Ok(self
                            .tools
                            .execute(call.clone(), context.tool_context())
                            .await)
                    })
                    .await?;

                let content = match outcome {
                    Ok(result) => result.output,
                    Err(error) if error.kind == ToolErrorKind::Cancelled => {
                        return Err(ChatError::from(error));
                    }
                    Err(error) => tool_failure_message(&call, &error),
                };
                messages.push(Message::tool(call.id, content));
            }
        }

        Err(ChatError::tool_round_limit(TOOL_ROUND_LIMIT_MESSAGE))
    }
}
