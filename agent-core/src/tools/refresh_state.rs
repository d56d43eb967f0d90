//! `refresh_browser_state_tool`: re-reads the current page's accessibility/DOM snapshot into a
//! fresh `browser_state` message (SPEC_FULL.md §4.1 tool suite). Glow-enabled.

use async_trait::async_trait;
use serde_json::Value;

use super::{
    Tool, ToolCallContext, ToolResultEnvelope, ToolSourceError, ToolSpec, TOOL_REFRESH_BROWSER_STATE,
};

pub struct RefreshBrowserStateTool;

#[async_trait]
impl Tool for RefreshBrowserStateTool {
    fn name(&self) -> &str {
        TOOL_REFRESH_BROWSER_STATE
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name().to_string(),
            description: "Refreshes the browser state snapshot of the current page.".to_string(),
            input_schema: serde_json::json!({"type": "object", "properties": {}}),
        }
    }

    async fn call(
        &self,
        _args: Value,
        ctx: &ToolCallContext<'_>,
    ) -> Result<ToolResultEnvelope, ToolSourceError> {
        match ctx.browser.get_browser_state_string().await {
            Ok(state) => Ok(ToolResultEnvelope::success(Value::String(state))),
            Err(e) => Ok(ToolResultEnvelope::failure(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::StubBrowserContext;
    use crate::pubsub::Narrator;

    #[tokio::test]
    async fn refresh_returns_current_browser_state_string() {
        let browser = StubBrowserContext::new().with_browser_state("cart page, 1 item");
        let narrator = Narrator::default();
        let ctx = ToolCallContext::new(&browser, &narrator, &[]);
        let result = RefreshBrowserStateTool.call(serde_json::json!({}), &ctx).await.unwrap();
        assert_eq!(result.output, "cart page, 1 item");
    }
}
