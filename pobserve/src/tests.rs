use std::sync::{Arc, Mutex};
use std::time::Duration;

use pchat::{ChatError, ChatPhase, ChatRuntimeHooks};
use pcommon::ConversationId;
use pprovider::{ProviderError, ProviderId, ProviderOperationHooks, ToolCall, ToolDefinition};
use ptooling::{ToolError, ToolExecutionContext, ToolExecutionResult, ToolRuntimeHooks};
use serde_json::json;

use crate::{
    MetricsObservabilityHooks, SafeChatHooks, SafeProviderHooks, SafeToolHooks,
    TracingObservabilityHooks,
};

fn sample_tool_call() -> ToolCall {
    ToolCall::new("call-1", "get_today_date", "{}")
}

fn sample_tool_context() -> ToolExecutionContext {
    ToolExecutionContext::new("conv-1").with_trace_id("trace-1")
}

fn sample_definitions() -> Vec<ToolDefinition> {
    vec![ToolDefinition {
        name: "get_today_date".to_string(),
        description: "Returns the current local date".to_string(),
        parameters: json!({"type": "object", "properties": {}}),
    }]
}

fn exercise_provider_hooks(hooks: &dyn ProviderOperationHooks) {
    let provider_error = ProviderError::timeout("provider timeout");

    hooks.on_request_start(ProviderId::OpenAi, "complete", "gpt-4.1");
    hooks.on_success(
        ProviderId::OpenAi,
        "complete",
        "gpt-4.1",
        Duration::from_millis(10),
    );
    hooks.on_failure(
        ProviderId::OpenAi,
        "complete",
        "gpt-4.1",
        &provider_error,
        Duration::from_millis(10),
    );
}

fn exercise_tool_hooks(hooks: &dyn ToolRuntimeHooks) {
    let tool_error = ToolError::execution("tool failed");

    hooks.on_execution_start(&sample_tool_call(), &sample_tool_context());
    hooks.on_execution_success(
        &sample_tool_call(),
        &sample_tool_context(),
        &ToolExecutionResult::new("call-1", "ok"),
        Duration::from_millis(20),
    );
    hooks.on_execution_failure(
        &sample_tool_call(),
        &sample_tool_context(),
        &tool_error,
        Duration::from_millis(20),
    );
}

fn exercise_chat_hooks(hooks: &dyn ChatRuntimeHooks) {
    let conversation_id = ConversationId::from("conv-1");
    let chat_error = ChatError::provider("upstream down").into_internal();

    hooks.on_tools_registered(&sample_definitions());
    hooks.on_tools_registered(&[]);
    hooks.on_phase_start(ChatPhase::Title, &conversation_id);
    hooks.on_phase_success(ChatPhase::Title, &conversation_id, Duration::from_millis(30));
    hooks.on_phase_failure(
        ChatPhase::Reply,
        &conversation_id,
        &chat_error,
        Duration::from_millis(30),
    );
    hooks.on_title_fallback(&conversation_id, "New conversation", "model returned no choices");
    hooks.on_reply_round(&conversation_id, 1, 2);
}

#[test]
fn tracing_hooks_smoke_test_all_callbacks() {
    let hooks = TracingObservabilityHooks;

    exercise_provider_hooks(&hooks);
    exercise_tool_hooks(&hooks);
    exercise_chat_hooks(&hooks);
}

#[test]
fn metrics_hooks_smoke_test_all_callbacks() {
    let hooks = MetricsObservabilityHooks;

    exercise_provider_hooks(&hooks);
    exercise_tool_hooks(&hooks);
    exercise_chat_hooks(&hooks);
}

#[derive(Default, Clone)]
struct RecordingHooks {
    events: Arc<Mutex<Vec<&'static str>>>,
}

impl RecordingHooks {
    fn record(&self, event: &'static str) {
        self.events.lock().expect("events lock").push(event);
    }

    fn events(&self) -> Vec<&'static str> {
        self.events.lock().expect("events lock").clone()
    }
}

impl ProviderOperationHooks for RecordingHooks {
    fn on_request_start(&self, _provider: ProviderId, _operation: &str, _model: &str) {
        self.record("request_start");
    }

    fn on_success(&self, _provider: ProviderId, _operation: &str, _model: &str, _elapsed: Duration) {
        self.record("success");
    }

    fn on_failure(
        &self,
        _provider: ProviderId,
        _operation: &str,
        _model: &str,
        _error: &ProviderError,
        _elapsed: Duration,
    ) {
        self.record("failure");
    }
}

impl ToolRuntimeHooks for RecordingHooks {
    fn on_execution_start(&self, _tool_call: &ToolCall, _context: &ToolExecutionContext) {
        self.record("execution_start");
    }

    fn on_execution_success(
        &self,
        _tool_call: &ToolCall,
        _context: &ToolExecutionContext,
        _result: &ToolExecutionResult,
        _elapsed: Duration,
    ) {
        self.record("execution_success");
    }

    fn on_execution_failure(
        &self,
        _tool_call: &ToolCall,
        _context: &ToolExecutionContext,
        _error: &ToolError,
        _elapsed: Duration,
    ) {
        self.record("execution_failure");
    }
}

impl ChatRuntimeHooks for RecordingHooks {
    fn on_tools_registered(&self, _tools: &[ToolDefinition]) {
        self.record("tools_registered");
    }

    fn on_phase_start(&self, _phase: ChatPhase, _conversation_id: &ConversationId) {
        self.record("phase_start");
    }

    fn on_phase_success(
        &self,
        _phase: ChatPhase,
        _conversation_id: &ConversationId,
        _elapsed: Duration,
    ) {
        self.record("phase_success");
    }

    fn on_phase_failure(
        &self,
        _phase: ChatPhase,
        _conversation_id: &ConversationId,
        _error: &ChatError,
        _elapsed: Duration,
    ) {
        self.record("phase_failure");
    }

    fn on_title_fallback(&self, _conversation_id: &ConversationId, _title: &str, _reason: &str) {
        self.record("title_fallback");
    }

    fn on_reply_round(&self, _conversation_id: &ConversationId, _round: usize, _tool_calls: usize) {
        self.record("reply_round");
    }
}

struct PanicHooks;

impl ProviderOperationHooks for PanicHooks {
    fn on_request_start(&self, _provider: ProviderId, _operation: &str, _model: &str) {
        panic!("request_start panic");
    }

    fn on_success(&self, _provider: ProviderId, _operation: &str, _model: &str, _elapsed: Duration) {
        panic!("success panic");
    }

    fn on_failure(
        &self,
        _provider: ProviderId,
        _operation: &str,
        _model: &str,
        _error: &ProviderError,
        _elapsed: Duration,
    ) {
        panic!("failure panic");
    }
}

impl ToolRuntimeHooks for PanicHooks {
    fn on_execution_start(&self, _tool_call: &ToolCall, _context: &ToolExecutionContext) {
        panic!("start panic");
    }

    fn on_execution_failure(
        &self,
        _tool_call: &ToolCall,
        _context: &ToolExecutionContext,
        _error: &ToolError,
        _elapsed: Duration,
    ) {
        panic!("failure panic");
    }
}

impl ChatRuntimeHooks for PanicHooks {
    fn on_tools_registered(&self, _tools: &[ToolDefinition]) {
        panic!("tools panic");
    }

    fn on_phase_failure(
        &self,
        _phase: ChatPhase,
        _conversation_id: &ConversationId,
        _error: &ChatError,
        _elapsed: Duration,
    ) {
        panic!("phase panic");
    }

    fn on_title_fallback(&self, _conversation_id: &ConversationId, _title: &str, _reason: &str) {
        panic!("fallback panic");
    }
}

#[test]
fn safe_provider_hooks_delegate_when_inner_succeeds() {
    let inner = RecordingHooks::default();
    let hooks = SafeProviderHooks::new(inner.clone());

    exercise_provider_hooks(&hooks);

    assert_eq!(inner.events(), vec!["request_start", "success", "failure"]);
}

#[test]
fn safe_tool_hooks_delegate_when_inner_succeeds() {
    let inner = RecordingHooks::default();
    let hooks = SafeToolHooks::new(inner.clone());

    exercise_tool_hooks(&hooks);

    assert_eq!(
        inner.events(),
        vec!["execution_start", "execution_success", "execution_failure"]
    );
}

#[test]
fn safe_chat_hooks_delegate_when_inner_succeeds() {
    let inner = RecordingHooks::default();
    let hooks = SafeChatHooks::new(inner.clone());

    exercise_chat_hooks(&hooks);

    assert_eq!(
        inner.events(),
        vec![
            "tools_registered",
            "tools_registered",
            "phase_start",
            "phase_success",
            "phase_failure",
            "title_fallback",
            "reply_round",
        ]
    );
}

#[test]
fn safe_hooks_swallow_panics() {
    exercise_provider_hooks(&SafeProviderHooks::new(PanicHooks));
    exercise_tool_hooks(&SafeToolHooks::new(PanicHooks));
    exercise_chat_hooks(&SafeChatHooks::new(PanicHooks));
}
