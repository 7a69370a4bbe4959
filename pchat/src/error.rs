//! Chat-layer errors and classification.
//!
//! ```rust
//! use pchat::{ChatError, ChatErrorKind, ChatErrorPhase};
//!
//! let err = ChatError::invalid_request("message must not be empty")
//!     .with_phase(ChatErrorPhase::Validation);
//! assert_eq!(err.kind, ChatErrorKind::InvalidRequest);
//! assert!(err.is_user_error());
//! assert!(err.to_string().contains("Validation"));
//! ```

use std::error::Error;
use std::fmt::{Display, Formatter};

use pprovider::{ProviderError, ProviderErrorKind};
use ptooling::{ToolError, ToolErrorKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatErrorKind {
    InvalidRequest,
    NotFound,
    Provider,
    Protocol,
    ToolRoundLimit,
    Cancelled,
    Store,
    Internal,
}

/// Stage of a turn at which an error surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatErrorPhase {
    Validation,
    Title,
    Reply,
    Persistence,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatError {
    pub kind: ChatErrorKind,
    pub message: String,
    pub phase: Option<ChatErrorPhase>,
    /// Original kind when the error was wrapped as `Internal`.
    pub cause: Option<ChatErrorKind>,
}

impl ChatError {
    pub fn new(kind: ChatErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            phase: None,
            cause: None,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::InvalidRequest, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::NotFound, message)
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Provider, message)
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Protocol, message)
    }

    pub fn tool_round_limit(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::ToolRoundLimit, message)
    }

    pub fn cancelled(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Cancelled, message)
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Store, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Internal, message)
    }

    pub fn with_phase(mut self, phase: ChatErrorPhase) -> Self {
        self.phase = Some(phase);
        self
    }

    pub fn with_cause(mut self, cause: ChatErrorKind) -> Self {
        self.cause = Some(cause);
        self
    }

    /// Re-labels this error as `Internal`, keeping the original kind as the cause.
    pub fn into_internal(self) -> Self {
        let cause = self.cause.unwrap_or(self.kind);
        Self {
            kind: ChatErrorKind::Internal,
            cause: Some(cause),
            ..self
        }
    }

    pub fn is_user_error(&self) -> bool {
        matches!(
            self.kind,
            ChatErrorKind::InvalidRequest | ChatErrorKind::NotFound
        )
    }

    pub fn is_cancelled(&self) -> bool {
        self.kind == ChatErrorKind::Cancelled
    }
}

impl Display for ChatError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.phase {
            Some(phase) => write!(f, "{:?} [phase={:?}]: {}", self.kind, phase, self.message),
            None => write!(f, "{:?}: {}", self.kind, self.message),
        }
    }
}

impl Error for ChatError {}

impl From<ProviderError> for ChatError {
    fn from(value: ProviderError) -> Self {
        match value.kind {
            ProviderErrorKind::Cancelled => ChatError::cancelled(value.message),
            _ => ChatError::provider(value.to_string()),
        }
    }
}

impl From<ToolError> for ChatError {
    fn from(value: ToolError) -> Self {
        match value.kind {
            ToolErrorKind::Cancelled => ChatError::cancelled(value.message),
            _ => ChatError::internal(value.to_string()),
        }
    }
}
