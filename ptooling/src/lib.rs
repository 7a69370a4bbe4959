//! Capability layer for registering and executing tools.
//!
//! A [`ToolRegistry`] is populated once at startup and then shared read-only; the
//! [`DefaultToolRuntime`] dispatches model-issued [`pprovider::ToolCall`]s against it.

mod args;
#[cfg(feature = "builtin-tools")]
pub mod builtin;
mod error;
mod hooks;
mod registry;
mod runtime;
mod tool;
mod types;

pub mod prelude {
    pub use crate::{
        DefaultToolRuntime, FunctionTool, NoopToolRuntimeHooks, Tool, ToolArgs, ToolError,
        ToolErrorKind, ToolExecutionContext, ToolExecutionResult, ToolFuture, ToolRegistry,
        ToolRuntime, ToolRuntimeHooks,
    };
}

pub use args::{
    optional_f64, optional_i64, optional_string, parse_json_object, parse_json_value,
    required_string,
};
pub use error::{ToolError, ToolErrorKind};
pub use hooks::{NoopToolRuntimeHooks, ToolRuntimeHooks};
pub use registry::ToolRegistry;
pub use runtime::{DEFAULT_TOOL_TIMEOUT, DefaultToolRuntime, ToolRuntime};
pub use tool::{FunctionTool, Tool, ToolArgs, ToolFuture};
pub use types::{ToolExecutionContext, ToolExecutionResult};
