//! Common `pprovider` imports for downstream crates.

pub use crate::{
    Choice, Message, ModelProvider, ModelRequest, ModelRequestBuilder, ModelResponse,
    NoopOperationHooks, ProviderError, ProviderErrorKind, ProviderFuture, ProviderId,
    ProviderOperationHooks, Role, SecretString, StopReason, TokenUsage, ToolCall, ToolDefinition,
};
pub use pcommon::{BoxFuture, GenerationOptions, MetadataMap};
