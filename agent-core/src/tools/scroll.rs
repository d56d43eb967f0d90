//! `scroll_tool`: scroll the current page up or down (SPEC_FULL.md §4.1 tool suite).
//! Glow-enabled.

use async_trait::async_trait;
use serde_json::Value;

use super::{Tool, ToolCallContext, ToolResultEnvelope, ToolSourceError, ToolSpec, TOOL_SCROLL};

pub struct ScrollTool;

#[async_trait]
impl Tool for ScrollTool {
    fn name(&self) -> &str {
        TOOL_SCROLL
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name().to_string(),
            description: "Scrolls the current page up or down by a number of pages.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "direction": {"type": "string", "enum": ["up", "down"]},
                    "amount": {"type": "number"}
                },
                "required": ["direction"]
            }),
        }
    }

    async fn call(
        &self,
        args: Value,
        ctx: &ToolCallContext<'_>,
    ) -> Result<ToolResultEnvelope, ToolSourceError> {
        let direction = args.get("direction").and_then(Value::as_str).unwrap_or_default();
        if direction != "up" && direction != "down" {
            return Ok(ToolResultEnvelope::failure(format!(
                "invalid direction: {direction}"
            )));
        }
        let amount = args.get("amount").and_then(Value::as_f64).unwrap_or(1.0);
        let page = match ctx.browser.get_current_page().await {
            Ok(page) => page,
            Err(e) => return Ok(ToolResultEnvelope::failure(e)),
        };
        Ok(ToolResultEnvelope::success(serde_json::json!({
            "tabId": page.tab_id,
            "direction": direction,
            "amount": amount,
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::StubBrowserContext;
    use crate::pubsub::Narrator;

    #[tokio::test]
    async fn scroll_down_defaults_amount_to_one_page() {
        let browser = StubBrowserContext::new();
        let narrator = Narrator::default();
        let ctx = ToolCallContext::new(&browser, &narrator, &[]);
        let result = ScrollTool
            .call(serde_json::json!({"direction": "down"}), &ctx)
            .await
            .unwrap();
        assert!(result.ok);
        assert_eq!(result.output["amount"], 1.0);
    }
}
