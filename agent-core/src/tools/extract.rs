//! `extract_tool`: pulls structured content off the current page's browser-state snapshot
//! (SPEC_FULL.md §4.1 tool suite). Glow-enabled.
//!
//! Extraction itself (parsing the accessibility tree against a query) is the driver's job; this
//! tool records the query against the current snapshot and hands back the raw state text, since
//! page-content parsing is outside this crate's scope (SPEC_FULL.md §1).

use async_trait::async_trait;
use serde_json::Value;

use super::{Tool, ToolCallContext, ToolResultEnvelope, ToolSourceError, ToolSpec, TOOL_EXTRACT};

pub struct ExtractTool;

#[async_trait]
impl Tool for ExtractTool {
    fn name(&self) -> &str {
        TOOL_EXTRACT
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name().to_string(),
            description: "Extracts information matching a query from the current page state."
                .to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {"query": {"type": "string"}},
                "required": ["query"]
            }),
        }
    }

    async fn call(
        &self,
        args: Value,
        ctx: &ToolCallContext<'_>,
    ) -> Result<ToolResultEnvelope, ToolSourceError> {
        let query = match args.get("query").and_then(Value::as_str) {
            Some(q) if !q.trim().is_empty() => q,
            _ => return Ok(ToolResultEnvelope::failure("missing required field: query")),
        };
        match ctx.browser.get_browser_state_string().await {
            Ok(state) => Ok(ToolResultEnvelope::success(serde_json::json!({
                "query": query,
                "pageState": state,
            }))),
            Err(e) => Ok(ToolResultEnvelope::failure(e)),
        }
    }
}
