//! `search_tool`: run a web search and open the result page in a new tab (SPEC_FULL.md §4.1 tool
//! suite). Glow-enabled.

use async_trait::async_trait;
use serde_json::Value;

use super::{Tool, ToolCallContext, ToolResultEnvelope, ToolSourceError, ToolSpec, TOOL_SEARCH};

pub struct SearchTool;

#[async_trait]
impl Tool for SearchTool {
    fn name(&self) -> &str {
        TOOL_SEARCH
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name().to_string(),
            description: "Runs a web search and opens the results in a new tab.".to_string(),
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
        let search_url = format!("https://www.google.com/search?q={}", urlencode(query));
        match ctx.browser.create_tab(&search_url).await {
            Ok(page) => Ok(ToolResultEnvelope::success(serde_json::json!({
                "tabId": page.tab_id,
                "url": page.url,
                "query": query,
            }))),
            Err(e) => Ok(ToolResultEnvelope::failure(e)),
        }
    }
}

/// Minimal query-string escaping; the browser side is responsible for real URL construction,
/// this only keeps the stub/test round trip readable.
fn urlencode(s: &str) -> String {
    s.replace(' ', "+")
}
