//! Tracing-based observability hooks for provider, tool runtime, and conversation phases.
//!
//! ```rust
//! use pobserve::TracingObservabilityHooks;
//! use pchat::ChatRuntimeHooks;
//!
//! fn accepts_chat_hooks(_hooks: &dyn ChatRuntimeHooks) {}
//!
//! let hooks = TracingObservabilityHooks;
//! accepts_chat_hooks(&hooks);
//! ```

use std::time::Duration;

use pchat::{ChatError, ChatPhase, ChatRuntimeHooks};
use pcommon::ConversationId;
use pprovider::{ProviderError, ProviderId, ProviderOperationHooks, ToolCall, ToolDefinition};
use ptooling::{ToolError, ToolExecutionContext, ToolExecutionResult, ToolRuntimeHooks};

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObservabilityHooks;

impl ProviderOperationHooks for TracingObservabilityHooks {
    fn on_request_start(&self, provider: ProviderId, operation: &str, model: &str) {
        tracing::info!(
            phase = "provider",
            event = "request_start",
            provider = %provider,
            operation,
            model
        );
    }

    fn on_success(&self, provider: ProviderId, operation: &str, model: &str, elapsed: Duration) {
        tracing::info!(
            phase = "provider",
            event = "success",
            provider = %provider,
            operation,
            model,
            elapsed_ms = elapsed.as_millis() as u64
        );
    }

    fn on_failure(
        &self,
        provider: ProviderId,
        operation: &str,
        model: &str,
        error: &ProviderError,
        elapsed: Duration,
    ) {
        tracing::error!(
            phase = "provider",
            event = "failure",
            provider = %provider,
            operation,
            model,
            elapsed_ms = elapsed.as_millis() as u64,
            error_kind = ?error.kind,
            retryable = error.retryable,
            error = %error
        );
    }
}

impl ToolRuntimeHooks for TracingObservabilityHooks {
    fn on_execution_start(&self, tool_call: &ToolCall, context: &ToolExecutionContext) {
        tracing::info!(
            phase = "tool",
            event = "execution_start",
            tool_name = tool_call.name,
            tool_call_id = tool_call.id,
            conversation_id = %context.conversation_id,
            trace_id = context.trace_id.as_ref().map(|id| id.as_str())
        );
    }

    fn on_execution_success(
        &self,
        tool_call: &ToolCall,
        context: &ToolExecutionContext,
        result: &ToolExecutionResult,
        elapsed: Duration,
    ) {
        tracing::info!(
            phase = "tool",
            event = "execution_success",
            tool_name = tool_call.name,
            tool_call_id = tool_call.id,
            conversation_id = %context.conversation_id,
            trace_id = context.trace_id.as_ref().map(|id| id.as_str()),
            output_bytes = result.output.len(),
            elapsed_ms = elapsed.as_millis() as u64
        );
    }

    fn on_execution_failure(
        &self,
        tool_call: &ToolCall,
        context: &ToolExecutionContext,
        error: &ToolError,
        elapsed: Duration,
    ) {
        tracing::warn!(
            phase = "tool",
            event = "execution_failure",
            tool_name = tool_call.name,
            tool_call_id = tool_call.id,
            conversation_id = %context.conversation_id,
            trace_id = context.trace_id.as_ref().map(|id| id.as_str()),
            elapsed_ms = elapsed.as_millis() as u64,
            error_kind = ?error.kind,
            retryable = error.retryable,
            error = %error
        );
    }
}

impl ChatRuntimeHooks for TracingObservabilityHooks {
    fn on_tools_registered(&self, tools: &[ToolDefinition]) {
        if tools.is_empty() {
            tracing::warn!(
                phase = "chat",
                event = "tools_registered",
                count = 0,
                "no tools registered; replies will not call tools"
            );
            return;
        }

        tracing::info!(phase = "chat", event = "tools_registered", count = tools.len());
        for tool in tools {
            tracing::info!(
                phase = "chat",
                event = "tool_registered",
                tool_name = tool.name,
                description = tool.description
            );
        }
    }

    fn on_phase_start(&self, phase: ChatPhase, conversation_id: &ConversationId) {
        tracing::info!(
            phase = "chat",
            event = "phase_start",
            chat_phase = phase.as_str(),
            conversation_id = %conversation_id
        );
    }

    fn on_phase_success(
        &self,
        phase: ChatPhase,
        conversation_id: &ConversationId,
        elapsed: Duration,
    ) {
        tracing::info!(
            phase = "chat",
            event = "phase_success",
            chat_phase = phase.as_str(),
            conversation_id = %conversation_id,
            elapsed_ms = elapsed.as_millis() as u64
        );
    }

    fn on_phase_failure(
        &self,
        phase: ChatPhase,
        conversation_id: &ConversationId,
        error: &ChatError,
        elapsed: Duration,
    ) {
        tracing::error!(
            phase = "chat",
            event = "phase_failure",
            chat_phase = phase.as_str(),
            conversation_id = %conversation_id,
            elapsed_ms = elapsed.as_millis() as u64,
            error_kind = ?error.kind,
            error_cause = ?error.cause,
            error = %error
        );
    }

    fn on_title_fallback(&self, conversation_id: &ConversationId, title: &str, reason: &str) {
        tracing::warn!(
            phase = "chat",
            event = "title_fallback",
            conversation_id = %conversation_id,
            title,
            reason
        );
    }

    fn on_reply_round(&self, conversation_id: &ConversationId, round: usize, tool_calls: usize) {
        tracing::debug!(
            phase = "chat",
            event = "reply_round",
            conversation_id = %conversation_id,
            round,
            tool_calls
        );
    }
}
