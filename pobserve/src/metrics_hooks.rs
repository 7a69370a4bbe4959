//! Metrics-based observability hooks for provider, tool runtime, and conversation phases.
//!
//! ```rust
//! use pobserve::MetricsObservabilityHooks;
//! use pprovider::ProviderOperationHooks;
//!
//! fn accepts_provider_hooks(_hooks: &dyn ProviderOperationHooks) {}
//!
//! let hooks = MetricsObservabilityHooks;
//! accepts_provider_hooks(&hooks);
//! ```

use std::time::Duration;

use pchat::{ChatError, ChatPhase, ChatRuntimeHooks};
use pcommon::ConversationId;
use pprovider::{ProviderError, ProviderId, ProviderOperationHooks, ToolCall, ToolDefinition};
use ptooling::{ToolError, ToolExecutionContext, ToolExecutionResult, ToolRuntimeHooks};

#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsObservabilityHooks;

impl ProviderOperationHooks for MetricsObservabilityHooks {
    fn on_request_start(&self, provider: ProviderId, operation: &str, model: &str) {
        metrics::counter!(
            "parley_provider_request_start_total",
            "provider" => provider.to_string(),
            "operation" => operation.to_string(),
            "model" => model.to_string()
        )
        .increment(1);
    }

    fn on_success(&self, provider: ProviderId, operation: &str, model: &str, elapsed: Duration) {
        metrics::counter!(
            "parley_provider_success_total",
            "provider" => provider.to_string(),
            "operation" => operation.to_string(),
            "model" => model.to_string()
        )
        .increment(1);
        metrics::histogram!(
            "parley_provider_request_duration_seconds",
            "provider" => provider.to_string(),
            "operation" => operation.to_string(),
            "status" => "success"
        )
        .record(elapsed.as_secs_f64());
    }

    fn on_failure(
        &self,
        provider: ProviderId,
        operation: &str,
        model: &str,
        error: &ProviderError,
        elapsed: Duration,
    ) {
        metrics::counter!(
            "parley_provider_failure_total",
            "provider" => provider.to_string(),
            "operation" => operation.to_string(),
            "model" => model.to_string(),
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
        metrics::histogram!(
            "parley_provider_request_duration_seconds",
            "provider" => provider.to_string(),
            "operation" => operation.to_string(),
            "status" => "failure"
        )
        .record(elapsed.as_secs_f64());
    }
}

impl ToolRuntimeHooks for MetricsObservabilityHooks {
    fn on_execution_start(&self, tool_call: &ToolCall, _context: &ToolExecutionContext) {
        metrics::counter!(
            "parley_tool_execution_start_total",
            "tool_name" => tool_call.name.clone()
        )
        .increment(1);
    }

    fn on_execution_success(
        &self,
        tool_call: &ToolCall,
        _context: &ToolExecutionContext,
        _result: &ToolExecutionResult,
        elapsed: Duration,
    ) {
        metrics::counter!(
            "parley_tool_execution_success_total",
            "tool_name" => tool_call.name.clone()
        )
        .increment(1);
        metrics::histogram!(
            "parley_tool_execution_duration_seconds",
            "tool_name" => tool_call.name.clone(),
            "status" => "success"
        )
        .record(elapsed.as_secs_f64());
    }

    fn on_execution_failure(
        &self,
        tool_call: &ToolCall,
        _context: &ToolExecutionContext,
        error: &ToolError,
        elapsed: Duration,
    ) {
        metrics::counter!(
            "parley_tool_execution_failure_total",
            "tool_name" => tool_call.name.clone(),
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
        metrics::histogram!(
            "parley_tool_execution_duration_seconds",
            "tool_name" => tool_call.name.clone(),
            "status" => "failure"
        )
        .record(elapsed.as_secs_f64());
    }
}

impl ChatRuntimeHooks for MetricsObservabilityHooks {
    fn on_tools_registered(&self, tools: &[ToolDefinition]) {
        metrics::gauge!("parley_chat_registered_tools").set(tools.len() as f64);
    }

    fn on_phase_start(&self, phase: ChatPhase, _conversation_id: &ConversationId) {
        metrics::counter!("parley_chat_phase_start_total", "phase" => phase.as_str())
            .increment(1);
    }

    fn on_phase_success(
        &self,
        phase: ChatPhase,
        _conversation_id: &ConversationId,
        elapsed: Duration,
    ) {
        metrics::counter!("parley_chat_phase_success_total", "phase" => phase.as_str())
            .increment(1);
        metrics::histogram!(
            "parley_chat_phase_duration_seconds",
            "phase" => phase.as_str(),
            "status" => "success"
        )
        .record(elapsed.as_secs_f64());
    }

    fn on_phase_failure(
        &self,
        phase: ChatPhase,
        _conversation_id: &ConversationId,
        error: &ChatError,
        elapsed: Duration,
    ) {
        metrics::counter!(
            "parley_chat_phase_failure_total",
            "phase" => phase.as_str(),
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
        metrics::histogram!(
            "parley_chat_phase_duration_seconds",
            "phase" => phase.as_str(),
            "status" => "failure"
        )
        .record(elapsed.as_secs_f64());
    }

    fn on_title_fallback(&self, _conversation_id: &ConversationId, _title: &str, _reason: &str) {
        metrics::counter!("parley_chat_title_fallback_total").increment(1);
    }

    fn on_reply_round(&self, _conversation_id: &ConversationId, _round: usize, tool_calls: usize) {
        metrics::counter!("parley_chat_reply_rounds_total").increment(1);
        metrics::histogram!("parley_chat_tool_calls_per_round").record(tool_calls as f64);
    }
}
