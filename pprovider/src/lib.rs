//! Provider-agnostic model types and the chat-completion provider contract.
//!
//! ```rust
//! use pprovider::{Message, ModelRequest, Role};
//!
//! let request = ModelRequest::builder("gpt-4.1")
//!     .message(Message::new(Role::System, "You are concise."))
//!     .message(Message::new(Role::User, "Summarize this"))
//!     .temperature(0.2)
//!     .build()
//!     .expect("request should be valid");
//!
//! assert_eq!(request.messages.len(), 2);
//! ```

pub mod adapters;
mod credentials;
mod error;
mod hooks;
mod model;
pub mod prelude;
mod provider;

pub use credentials::SecretString;
pub use error::{ProviderError, ProviderErrorKind};
pub use hooks::{NoopOperationHooks, ProviderOperationHooks};
pub use model::{
    Choice, Message, ModelRequest, ModelRequestBuilder, ModelResponse, ProviderId, Role,
    StopReason, TokenUsage, ToolCall, ToolDefinition,
};
pub use provider::{ModelProvider, ProviderFuture};
