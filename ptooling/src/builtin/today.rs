use chrono::{Local, SecondsFormat};
use pprovider::ToolDefinition;
use serde_json::json;

use crate::{Tool, ToolArgs, ToolError, ToolExecutionContext, ToolFuture};

/// Reports the current local date-time in RFC 3339.
#[derive(Debug, Clone, Copy, Default)]
pub struct TodayDateTool;

impl Tool for TodayDateTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "get_today_date".to_string(),
            description: "Get today's date and time in RFC3339 format.".to_string(),
            parameters: json!({"type": "object", "properties": {}}),
        }
    }

    fn invoke<'a>(
        &'a self,
        _args: &'a ToolArgs,
        _context: &'a ToolExecutionContext,
    ) -> ToolFuture<'a, Result<String, ToolError>> {
        Box::pin(async move { Ok(Local::now().to_rfc3339_opts(SecondsFormat::Secs, true)) })
    }
}
