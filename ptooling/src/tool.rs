//! Tool trait contract for registry-managed capabilities.
//!
//! ```rust
//! use pprovider::ToolDefinition;
//! use ptooling::{FunctionTool, Tool};
//! use serde_json::json;
//!
//! let tool = FunctionTool::new(
//!     ToolDefinition {
//!         name: "echo".to_string(),
//!         description: "Echoes input".to_string(),
//!         parameters: json!({"type": "object", "properties": {}}),
//!     },
//!     |args, _ctx| async move { Ok(serde_json::Value::Object(args).to_string()) },
//! );
//!
//! assert_eq!(tool.name(), "echo");
//! ```

use std::future::Future;
use std::sync::Arc;

use pcommon::BoxFuture;
use pprovider::ToolDefinition;
use serde_json::{Map, Value};

use crate::{ToolError, ToolExecutionContext};

pub type ToolFuture<'a, T> = BoxFuture<'a, T>;

pub type ToolArgs = Map<String, Value>;

pub trait Tool: Send + Sync {
    fn definition(&self) -> ToolDefinition;

    fn name(&self) -> String {
        self.definition().name
    }

    fn invoke<'a>(
        &'a self,
        args: &'a ToolArgs,
        context: &'a ToolExecutionContext,
    ) -> ToolFuture<'a, Result<String, ToolError>>;
}

type ToolHandler =
    dyn Fn(ToolArgs, ToolExecutionContext) -> ToolFuture<'static, Result<String, ToolError>>
        + Send
        + Sync;

pub struct FunctionTool {
    definition: ToolDefinition,
    handler: Arc<ToolHandler>,
}

impl FunctionTool {
    pub fn new<F, Fut>(definition: ToolDefinition, handler: F) -> Self
    where
        F: Fn(ToolArgs, ToolExecutionContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String, ToolError>> + Send + 'static,
    {
        let handler: Arc<ToolHandler> =
            Arc::new(move |args, context| Box::pin(handler(args, context)));

        Self {
            definition,
            handler,
        }
    }
}

impl Tool for FunctionTool {
    fn definition(&self) -> ToolDefinition {
        self.definition.clone()
    }

    fn name(&self) -> String {
        self.definition.name.clone()
    }

    fn invoke<'a>(
        &'a self,
        args: &'a ToolArgs,
        context: &'a ToolExecutionContext,
    ) -> ToolFuture<'a, Result<String, ToolError>> {
        (self.handler)(args.clone(), context.clone())
    }
}
