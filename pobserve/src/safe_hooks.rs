use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

use pchat::{ChatError, ChatPhase, ChatRuntimeHooks};
use pcommon::ConversationId;
use pprovider::{ProviderError, ProviderId, ProviderOperationHooks, ToolCall, ToolDefinition};
use ptooling::{ToolError, ToolExecutionContext, ToolExecutionResult, ToolRuntimeHooks};

pub struct SafeProviderHooks<H> {
    inner: H,
}

impl<H> SafeProviderHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H> ProviderOperationHooks for SafeProviderHooks<H>
where
    H: ProviderOperationHooks,
{
    fn on_request_start(&self, provider: ProviderId, operation: &str, model: &str) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_request_start(provider, operation, model)
        }));
    }

    fn on_success(&self, provider: ProviderId, operation: &str, model: &str, elapsed: Duration) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_success(provider, operation, model, elapsed)
        }));
    }

    fn on_failure(
        &self,
        provider: ProviderId,
        operation: &str,
        model: &str,
        error: &ProviderError,
        elapsed: Duration,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_failure(provider, operation, model, error, elapsed)
        }));
    }
}

pub struct SafeToolHooks<H> {
    inner: H,
}

impl<H> SafeToolHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H> ToolRuntimeHooks for SafeToolHooks<H>
where
    H: ToolRuntimeHooks,
{
    fn on_execution_start(&self, tool_call: &ToolCall, context: &ToolExecutionContext) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_execution_start(tool_call, context)
        }));
    }

    fn on_execution_success(
        &self,
        tool_call: &ToolCall,
        context: &ToolExecutionContext,
        result: &ToolExecutionResult,
        elapsed: Duration,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_execution_success(tool_call, context, result, elapsed)
        }));
    }

    fn on_execution_failure(
        &self,
        tool_call: &ToolCall,
        context: &ToolExecutionContext,
        error: &ToolError,
        elapsed: Duration,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_execution_failure(tool_call, context, error, elapsed)
        }));
    }
}

pub struct SafeChatHooks<H> {
    inner: H,
}

impl<H> SafeChatHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H> ChatRuntimeHooks for SafeChatHooks<H>
where
    H: ChatRuntimeHooks,
{
    fn on_tools_registered(&self, tools: &[ToolDefinition]) {
        let _ = catch_unwind(AssertUnwindSafe(|| self.inner.on_tools_registered(tools)));
    }

    fn on_phase_start(&self, phase: ChatPhase, conversation_id: &ConversationId) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_phase_start(phase, conversation_id)
        }));
    }

    fn on_phase_success(
        &self,
        phase: ChatPhase,
        conversation_id: &ConversationId,
        elapsed: Duration,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_phase_success(phase, conversation_id, elapsed)
        }));
    }

    fn on_phase_failure(
        &self,
        phase: ChatPhase,
        conversation_id: &ConversationId,
        error: &ChatError,
        elapsed: Duration,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_phase_failure(phase, conversation_id, error, elapsed)
        }));
    }

    fn on_title_fallback(&self, conversation_id: &ConversationId, title: &str, reason: &str) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_title_fallback(conversation_id, title, reason)
        }));
    }

    fn on_reply_round(&self, conversation_id: &ConversationId, round: usize, tool_calls: usize) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_reply_round(conversation_id, round, tool_calls)
        }));
    }
}
