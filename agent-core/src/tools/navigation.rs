//! `navigation_tool`: go to a URL, go back, or reload the current tab (SPEC_FULL.md §4.1 tool
//! suite). Glow-enabled: a visible page mutation.

use async_trait::async_trait;
use serde_json::Value;

use super::{Tool, ToolCallContext, ToolResultEnvelope, ToolSourceError, ToolSpec, TOOL_NAVIGATION};

pub struct NavigationTool;

#[async_trait]
impl Tool for NavigationTool {
    fn name(&self) -> &str {
        TOOL_NAVIGATION
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name().to_string(),
            description: "Navigates the current tab to a URL.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {"url": {"type": "string"}},
                "required": ["url"]
            }),
        }
    }

    async fn call(
        &self,
        args: Value,
        ctx: &ToolCallContext<'_>,
    ) -> Result<ToolResultEnvelope, ToolSourceError> {
        let url = match args.get("url").and_then(Value::as_str) {
            Some(url) => url,
            None => return Ok(ToolResultEnvelope::failure("missing required field: url")),
        };
        let page = match ctx.browser.get_current_page().await {
            Ok(page) => page,
            Err(e) => return Ok(ToolResultEnvelope::failure(e)),
        };
        match ctx.browser.navigate(&page.tab_id, url).await {
            Ok(()) => Ok(ToolResultEnvelope::success(serde_json::json!({
                "tabId": page.tab_id,
                "url": url,
            }))),
            Err(e) => Ok(ToolResultEnvelope::failure(e)),
        }
    }
}
