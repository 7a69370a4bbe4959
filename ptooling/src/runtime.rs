//! Tool runtime trait and default registry-backed executor.
//!
//! The default runtime resolves a [`ToolCall`] by exact name, decodes its argument
//! payload into a JSON object, and invokes the tool under a per-call timeout while
//! watching the context's cancellation token and deadline.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_timer::Delay;
use futures_util::future::{Either, select};
use pprovider::ToolCall;

use crate::{
    NoopToolRuntimeHooks, ToolError, ToolExecutionContext, ToolExecutionResult, ToolFuture,
    ToolRegistry, ToolRuntimeHooks, parse_json_object,
};

pub const DEFAULT_TOOL_TIMEOUT: Duration = Duration::from_secs(10);

pub trait ToolRuntime: Send + Sync {
    fn execute<'a>(
        &'a self,
        tool_call: ToolCall,
        context: ToolExecutionContext,
    ) -> ToolFuture<'a, Result<ToolExecutionResult, ToolError>>;

    /// Catalog of tools this runtime can dispatch to, in advertisement order.
    fn registry(&self) -> Arc<ToolRegistry>;
}

#[derive(Clone)]
pub struct DefaultToolRuntime {
    registry: Arc<ToolRegistry>,
    timeout: Duration,
    hooks: Arc<dyn ToolRuntimeHooks>,
}

impl Default for DefaultToolRuntime {
    fn default() -> Self {
        Self::new(Arc::new(ToolRegistry::new()))
    }
}

impl DefaultToolRuntime {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self {
            registry,
            timeout: DEFAULT_TOOL_TIMEOUT,
            hooks: Arc::new(NoopToolRuntimeHooks),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn ToolRuntimeHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn budget(&self, context: &ToolExecutionContext) -> Duration {
        match context.remaining() {
            Some(remaining) => remaining.min(self.timeout),
            None => self.timeout,
        }
    }

    async fn run(
        &self,
        tool_call: &ToolCall,
        context: &ToolExecutionContext,
    ) -> Result<ToolExecutionResult, ToolError> {
        if context.is_cancelled() {
            return Err(ToolError::cancelled("tool execution cancelled"));
        }

        let tool = self.registry.find(&tool_call.name).ok_or_else(|| {
            ToolError::not_found(format!("tool '{}' is not registered", tool_call.name))
        })?;

        let args = parse_json_object(&tool_call.arguments)?;
        let budget = self.budget(context);

        let invocation = tool.invoke(&args, context);
        let cancelled = Box::pin(context.cancellation.cancelled());
        let timer = Delay::new(budget);

        match select(invocation, select(cancelled, timer)).await {
            Either::Left((output, _)) => Ok(ToolExecutionResult::from_call(tool_call, output?)),
            Either::Right((Either::Left(_), _)) => {
                Err(ToolError::cancelled("tool execution cancelled"))
            }
            Either::Right((Either::Right(_), _)) => Err(ToolError::timeout(format!(
                "tool '{}' timed out after {}ms",
                tool_call.name,
                budget.as_millis()
            ))),
        }
    }
}

impl ToolRuntime for DefaultToolRuntime {
    fn execute<'a>(
        &'a self,
        tool_call: ToolCall,
        context: ToolExecutionContext,
    ) -> ToolFuture<'a, Result<ToolExecutionResult, ToolError>> {
        Box::pin(async move {
            let started = Instant::now();
            self.hooks.on_execution_start(&tool_call, &context);

            match self.run(&tool_call, &context).await {
                Ok(result) => {
                    self.hooks
                        .on_execution_success(&tool_call, &context, &result, started.elapsed());
                    Ok(result)
                }
                Err(error) => {
                    let error = error
                        .with_tool_name(tool_call.name.clone())
                        .with_tool_call_id(tool_call.id.clone());
                    self.hooks
                        .on_execution_failure(&tool_call, &context, &error, started.elapsed());
                    Err(error)
                }
            }
        })
    }

    fn registry(&self) -> Arc<ToolRegistry> {
        Arc::clone(&self.registry)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use pprovider::{ToolCall, ToolDefinition};
    use serde_json::json;

    use super::*;
    use crate::{Tool, ToolArgs, ToolErrorKind};

    #[derive(Debug)]
    struct EchoTool;

    impl Tool for EchoTool {
        fn definition(&self) -> ToolDefinition {
            ToolDefinition {
                name: "echo".to_string(),
                description: "Echoes arguments".to_string(),
                parameters: json!({"type": "object", "properties": {"text": {"type": "string"}}}),
            }
        }

        fn invoke<'a>(
            &'a self,
            args: &'a ToolArgs,
            context: &'a ToolExecutionContext,
        ) -> ToolFuture<'a, Result<String, ToolError>> {
            Box::pin(async move {
                let text = args.get("text").and_then(|value| value.as_str()).unwrap_or("");
                Ok(format!("conversation={} text={}", context.conversation_id, text))
            })
        }
    }

    #[derive(Debug)]
    struct BrokenTool;

    impl Tool for BrokenTool {
        fn definition(&self) -> ToolDefinition {
            ToolDefinition {
                name: "broken".to_string(),
                description: "Always fails".to_string(),
                parameters: json!({"type": "object"}),
            }
        }

        fn invoke<'a>(
            &'a self,
            _args: &'a ToolArgs,
            _context: &'a ToolExecutionContext,
        ) -> ToolFuture<'a, Result<String, ToolError>> {
            Box::pin(async move { Err(ToolError::execution("tool exploded")) })
        }
    }

    #[derive(Debug)]
    struct SlowTool;

    impl Tool for SlowTool {
        fn definition(&self) -> ToolDefinition {
            ToolDefinition {
                name: "slow".to_string(),
                description: "Sleeps before answering".to_string(),
                parameters: json!({"type": "object"}),
            }
        }

        fn invoke<'a>(
            &'a self,
            _args: &'a ToolArgs,
            _context: &'a ToolExecutionContext,
        ) -> ToolFuture<'a, Result<String, ToolError>> {
            Box::pin(async move {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok("late".to_string())
            })
        }
    }

    #[derive(Default)]
    struct RecordingHooks {
        events: Mutex<Vec<String>>,
    }

    impl ToolRuntimeHooks for RecordingHooks {
        fn on_execution_start(&self, tool_call: &ToolCall, _context: &ToolExecutionContext) {
            self.events
                .lock()
                .expect("events lock")
                .push(format!("start:{}", tool_call.id));
        }

        fn on_execution_success(
            &self,
            tool_call: &ToolCall,
            _context: &ToolExecutionContext,
            _result: &ToolExecutionResult,
            _elapsed: Duration,
        ) {
            self.events
                .lock()
                .expect("events lock")
                .push(format!("success:{}", tool_call.id));
        }

        fn on_execution_failure(
            &self,
            tool_call: &ToolCall,
            _context: &ToolExecutionContext,
            error: &ToolError,
            _elapsed: Duration,
        ) {
            self.events
                .lock()
                .expect("events lock")
                .push(format!("failure:{}:{:?}", tool_call.id, error.kind));
        }
    }

    fn runtime_with(tools: Vec<Arc<dyn Tool>>) -> DefaultToolRuntime {
        DefaultToolRuntime::new(Arc::new(
            ToolRegistry::from_tools(tools).expect("registry should build"),
        ))
    }

    #[tokio::test]
    async fn runtime_executes_registered_tool_with_decoded_arguments() {
        let runtime = runtime_with(vec![Arc::new(EchoTool)]);

        let result = runtime
            .execute(
                ToolCall::new("call_1", "echo", r#"{"text":"hello"}"#),
                ToolExecutionContext::new("conv-1"),
            )
            .await
            .expect("execution should succeed");

        assert_eq!(result.tool_call_id, "call_1");
        assert_eq!(result.output, "conversation=conv-1 text=hello");
    }

    #[tokio::test]
    async fn runtime_returns_not_found_for_unknown_tool() {
        let runtime = runtime_with(Vec::new());

        let error = runtime
            .execute(
                ToolCall::new("call_2", "missing", "{}"),
                ToolExecutionContext::new("conv-2"),
            )
            .await
            .expect_err("execution should fail");

        assert_eq!(error.kind, ToolErrorKind::NotFound);
        assert_eq!(error.tool_call_id.as_deref(), Some("call_2"));
    }

    #[tokio::test]
    async fn lookup_is_case_sensitive() {
        let runtime = runtime_with(vec![Arc::new(EchoTool)]);

        let error = runtime
            .execute(
                ToolCall::new("call_3", "Echo", "{}"),
                ToolExecutionContext::new("conv-3"),
            )
            .await
            .expect_err("case mismatch should fail");

        assert_eq!(error.kind, ToolErrorKind::NotFound);
    }

    #[tokio::test]
    async fn unparseable_arguments_are_malformed() {
        let runtime = runtime_with(vec![Arc::new(EchoTool)]);

        for raw in ["", "{not json", "42"] {
            let error = runtime
                .execute(
                    ToolCall::new("call_4", "echo", raw),
                    ToolExecutionContext::new("conv-4"),
                )
                .await
                .expect_err("arguments should fail");
            assert_eq!(error.kind, ToolErrorKind::MalformedArguments, "payload {raw:?}");
        }
    }

    #[tokio::test]
    async fn runtime_propagates_tool_execution_error() {
        let runtime = runtime_with(vec![Arc::new(BrokenTool)]);

        let error = runtime
            .execute(
                ToolCall::new("call_5", "broken", "{}"),
                ToolExecutionContext::new("conv-5"),
            )
            .await
            .expect_err("execution should fail");

        assert_eq!(error.kind, ToolErrorKind::Execution);
        assert_eq!(error.message, "tool exploded");
    }

    #[tokio::test]
    async fn slow_tool_times_out() {
        let runtime = runtime_with(vec![Arc::new(SlowTool)]).with_timeout(Duration::from_millis(20));

        let error = runtime
            .execute(
                ToolCall::new("call_6", "slow", "{}"),
                ToolExecutionContext::new("conv-6"),
            )
            .await
            .expect_err("execution should time out");

        assert_eq!(error.kind, ToolErrorKind::Timeout);
        assert!(error.is_retryable());
    }

    #[tokio::test]
    async fn cancellation_aborts_in_flight_tool() {
        let runtime = runtime_with(vec![Arc::new(SlowTool)]);
        let context = ToolExecutionContext::new("conv-7");
        let token = context.cancellation.clone();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            token.cancel();
        });

        let started = Instant::now();
        let error = runtime
            .execute(ToolCall::new("call_7", "slow", "{}"), context)
            .await
            .expect_err("execution should be cancelled");

        assert_eq!(error.kind, ToolErrorKind::Cancelled);
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn deadline_shortens_the_timeout_budget() {
        let runtime = runtime_with(vec![Arc::new(SlowTool)]);
        let context = ToolExecutionContext::new("conv-8")
            .with_deadline(Instant::now() + Duration::from_millis(20));

        let error = runtime
            .execute(ToolCall::new("call_8", "slow", "{}"), context)
            .await
            .expect_err("deadline should expire");

        assert_eq!(error.kind, ToolErrorKind::Timeout);
    }

    #[tokio::test]
    async fn hooks_observe_success_and_failure() {
        let hooks = Arc::new(RecordingHooks::default());
        let runtime = runtime_with(vec![Arc::new(EchoTool), Arc::new(BrokenTool)])
            .with_hooks(hooks.clone());

        let _ = runtime
            .execute(ToolCall::new("a", "echo", "{}"), ToolExecutionContext::new("c"))
            .await;
        let _ = runtime
            .execute(ToolCall::new("b", "broken", "{}"), ToolExecutionContext::new("c"))
            .await;

        let events = hooks.events.lock().expect("events lock").clone();
        assert_eq!(
            events,
            vec![
                "start:a".to_string(),
                "success:a".to_string(),
                "start:b".to_string(),
                "failure:b:Execution".to_string(),
            ]
        );
    }

    #[test]
    fn registry_keeps_order_and_rejects_duplicates() {
        let mut registry = ToolRegistry::new();
        assert!(registry.is_empty());

        registry.register(EchoTool).expect("echo registers");
        registry.register(BrokenTool).expect("broken registers");
        let error = registry.register(EchoTool).expect_err("duplicate should fail");

        assert_eq!(error.kind, ToolErrorKind::DuplicateName);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), vec!["echo".to_string(), "broken".to_string()]);
        assert!(registry.find("echo").is_some());
        assert!(registry.find("ech").is_none());
        assert_eq!(registry.all().len(), 2);
        assert_eq!(registry.definitions()[1].name, "broken");
    }
}
