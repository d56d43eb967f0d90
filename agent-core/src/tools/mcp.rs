//! `mcp_tool`: thin passthrough slot for a single externally-registered MCP tool call.
//!
//! Full MCP client/source machinery is dropped (see DESIGN.md's trim notes) since no spec'd
//! tool needs it; this stub keeps the name reserved in the tool-name constant set and echoes its
//! input back as a `ToolSourceError::Transport` placeholder, so a future MCP adapter has a single
//! well-defined seam to replace rather than a missing one.

use async_trait::async_trait;
use serde_json::Value;

use super::{Tool, ToolCallContext, ToolResultEnvelope, ToolSourceError, ToolSpec, TOOL_MCP};

pub struct McpTool;

#[async_trait]
impl Tool for McpTool {
    fn name(&self) -> &str {
        TOOL_MCP
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name().to_string(),
            description: "Invokes an externally-registered MCP tool by name.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "toolName": {"type": "string"},
                    "arguments": {"type": "object"}
                },
                "required": ["toolName"]
            }),
        }
    }

    async fn call(
        &self,
        args: Value,
        _ctx: &ToolCallContext<'_>,
    ) -> Result<ToolResultEnvelope, ToolSourceError> {
        let tool_name = args
            .get("toolName")
            .and_then(Value::as_str)
            .unwrap_or("<unnamed>")
            .to_string();
        Ok(ToolResultEnvelope::failure(format!(
            "no MCP transport configured for {tool_name}"
        )))
    }
}
