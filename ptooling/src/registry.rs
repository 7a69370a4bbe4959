//! Tool registry for lookup by tool definition name.
//!
//! Registration happens once at startup; afterwards the registry is shared read-only
//! behind an `Arc`.
//!
//! ```rust
//! use pprovider::ToolDefinition;
//! use ptooling::{ToolErrorKind, ToolRegistry};
//! use serde_json::json;
//!
//! let definition = ToolDefinition {
//!     name: "get_today_date".to_string(),
//!     description: "Today's date".to_string(),
//!     parameters: json!({"type": "object", "properties": {}}),
//! };
//!
//! let mut registry = ToolRegistry::new();
//! registry
//!     .register_sync_fn(definition.clone(), |_args, _ctx| Ok("2026-01-01".to_string()))
//!     .expect("first registration succeeds");
//! let duplicate = registry
//!     .register_sync_fn(definition, |_args, _ctx| Ok(String::new()))
//!     .expect_err("duplicate names are rejected");
//! assert_eq!(duplicate.kind, ToolErrorKind::DuplicateName);
//! ```

use std::future::Future;
use std::sync::Arc;

use pcommon::Registry;
use pprovider::ToolDefinition;

use crate::{FunctionTool, Tool, ToolArgs, ToolError, ToolExecutionContext};

#[derive(Default)]
pub struct ToolRegistry {
    tools: Registry<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from a list of tools, failing on the first duplicate name.
    pub fn from_tools(tools: Vec<Arc<dyn Tool>>) -> Result<Self, ToolError> {
        let mut registry = Self::new();
        for tool in tools {
            registry.register_arc(tool)?;
        }
        Ok(registry)
    }

    pub fn register<T>(&mut self, tool: T) -> Result<(), ToolError>
    where
        T: Tool + 'static,
    {
        self.register_arc(Arc::new(tool))
    }

    pub fn register_arc(&mut self, tool: Arc<dyn Tool>) -> Result<(), ToolError> {
        let name = tool.name();
        if name.trim().is_empty() {
            return Err(ToolError::invalid_arguments("tool name must not be empty"));
        }
        if self.tools.contains_key(&name) {
            return Err(
                ToolError::duplicate_name(format!("tool '{name}' is already registered"))
                    .with_tool_name(name),
            );
        }

        self.tools.insert(name, tool);
        Ok(())
    }

    pub fn register_fn<F, Fut>(
        &mut self,
        definition: ToolDefinition,
        handler: F,
    ) -> Result<(), ToolError>
    where
        F: Fn(ToolArgs, ToolExecutionContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String, ToolError>> + Send + 'static,
    {
        self.register(FunctionTool::new(definition, handler))
    }

    pub fn register_sync_fn<F>(
        &mut self,
        definition: ToolDefinition,
        handler: F,
    ) -> Result<(), ToolError>
    where
        F: Fn(ToolArgs, ToolExecutionContext) -> Result<String, ToolError> + Send + Sync + 'static,
    {
        self.register_fn(definition, move |args, context| {
            let output = handler(args, context);
            async move { output }
        })
    }

    /// Exact, case-sensitive lookup.
    pub fn find(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Every tool in registration order.
    pub fn all(&self) -> Vec<Arc<dyn Tool>> {
        self.tools.values().cloned().collect()
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|tool| tool.definition()).collect()
    }

    pub fn names(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}
