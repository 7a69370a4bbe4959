//! Tool runtime context and execution result types.

use std::time::{Duration, Instant};

use pcommon::{ConversationId, MetadataMap, TraceId};
use pprovider::{Message, ToolCall};
use tokio_util::sync::CancellationToken;

/// Per-invocation context handed to every tool.
///
/// Cancelling the token aborts the in-flight invocation; the deadline caps how long the
/// runtime waits regardless of the tool's own timeout.
#[derive(Debug, Clone)]
pub struct ToolExecutionContext {
    pub conversation_id: ConversationId,
    pub trace_id: Option<TraceId>,
    pub metadata: MetadataMap,
    pub cancellation: CancellationToken,
    pub deadline: Option<Instant>,
}

impl ToolExecutionContext {
    pub fn new(conversation_id: impl Into<ConversationId>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            trace_id: None,
            metadata: MetadataMap::new(),
            cancellation: CancellationToken::new(),
            deadline: None,
        }
    }

    pub fn with_trace_id(mut self, trace_id: impl Into<TraceId>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
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

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Time left before the deadline, or `None` when no deadline is set.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolExecutionResult {
    pub tool_call_id: String,
    pub output: String,
}

impl ToolExecutionResult {
    pub fn new(tool_call_id: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            output: output.into(),
        }
    }

    pub fn from_call(call: &ToolCall, output: impl Into<String>) -> Self {
        Self::new(call.id.clone(), output)
    }

    pub fn into_message(self) -> Message {
        Message::tool(self.tool_call_id, self.output)
    }
}
