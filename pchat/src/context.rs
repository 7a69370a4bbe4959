//! Per-turn execution context carrying identity, cancellation, and deadline.

use std::future::Future;
use std::time::{Duration, Instant};

use pcommon::{ConversationId, TraceId};
use ptooling::ToolExecutionContext;
use tokio_util::sync::CancellationToken;

use crate::ChatError;

#[derive(Debug, Clone)]
pub struct ChatContext {
    pub conversation_id: ConversationId,
    pub trace_id: Option<TraceId>,
    pub cancellation: CancellationToken,
    pub deadline: Option<Instant>,
}

impl ChatContext {
    pub fn new(conversation_id: impl Into<ConversationId>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            trace_id: None,
            cancellation: CancellationToken::new(),
            deadline: None,
        }
    }

    pub fn with_trace_id(mut self, trace_id: impl Into<TraceId>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = cancellation;
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Same identity and deadline; cancelling the parent also cancels the child.
    pub fn child(&self) -> Self {
        Self {
            cancellation: self.cancellation.child_token(),
            ..self.clone()
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    pub fn tool_context(&self) -> ToolExecutionContext {
        let mut context = ToolExecutionContext::new(self.conversation_id.clone())
            .with_cancellation(self.cancellation.clone());
        if let Some(trace_id) = &self.trace_id {
            context = context.with_trace_id(trace_id.clone());
        }
        if let Some(deadline) = self.deadline {
            context = context.with_deadline(deadline);
        }
        context
    }

    /// Drives `future` to completion unless the context is cancelled or its deadline passes
    /// first, in which case the future is dropped.
    pub async fn run<T, F>(&self, future: F) -> Result<T, ChatError>
    where
        F: Future<Output = Result<T, ChatError>>,
    {
        if self.is_cancelled() {
            return Err(ChatError::cancelled("operation cancelled"));
        }

        let deadline = async {
            match self.deadline {
                Some(deadline) => {
                    tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await
                }
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.cancellation.cancelled() => Err(ChatError::cancelled("operation cancelled")),
            _ = deadline => Err(ChatError::cancelled("deadline exceeded")),
            result = future => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ChatErrorKind;

    #[tokio::test]
    async fn run_returns_result_when_not_cancelled() {
        let context = ChatContext::new("conv-1");
        let value = context.run(async { Ok::<_, ChatError>(7) }).await;
        assert_eq!(value, Ok(7));
    }

    #[tokio::test]
    async fn cancelling_parent_cancels_child_run() {
        let parent = ChatContext::new("conv-2");
        let child = parent.child();
        parent.cancellation.cancel();

        let error = child
            .run(std::future::pending::<Result<(), ChatError>>())
            .await
            .expect_err("child should observe cancellation");
        assert_eq!(error.kind, ChatErrorKind::Cancelled);
    }

    #[tokio::test]
    async fn deadline_aborts_pending_work() {
        let context = ChatContext::new("conv-3").with_timeout(Duration::from_millis(10));

        let error = context
            .run(std::future::pending::<Result<(), ChatError>>())
            .await
            .expect_err("deadline should fire");
        assert_eq!(error.message, "deadline exceeded");
    }

    #[test]
    fn tool_context_shares_cancellation() {
        let context = ChatContext::new("conv-4").with_trace_id("trace-4");
        let tool_context = context.tool_context();
        context.cancellation.cancel();

        assert!(tool_context.is_cancelled());
        assert_eq!(tool_context.conversation_id.as_str(), "conv-4");
        assert_eq!(tool_context.trace_id.map(|id| id.to_string()), Some("trace-4".to_string()));
    }
}
