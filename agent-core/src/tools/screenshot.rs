//! `screenshot_tool`: captures a screenshot of the current tab (SPEC_FULL.md §4.1 tool suite).
//! Glow-enabled. Output carries byte length rather than the raw bytes — the image itself is
//! published to the UI side out of band through the narrator, not round-tripped through the
//! message log.

use async_trait::async_trait;
use serde_json::Value;

use crate::pubsub::Role;

use super::{Tool, ToolCallContext, ToolResultEnvelope, ToolSourceError, ToolSpec, TOOL_SCREENSHOT};

pub struct ScreenshotTool;

#[async_trait]
impl Tool for ScreenshotTool {
    fn name(&self) -> &str {
        TOOL_SCREENSHOT
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name().to_string(),
            description: "Takes a screenshot of the current tab.".to_string(),
            input_schema: serde_json::json!({"type": "object", "properties": {}}),
        }
    }

    async fn call(
        &self,
        _args: Value,
        ctx: &ToolCallContext<'_>,
    ) -> Result<ToolResultEnvelope, ToolSourceError> {
        let page = match ctx.browser.get_current_page().await {
            Ok(page) => page,
            Err(e) => return Ok(ToolResultEnvelope::failure(e)),
        };
        match ctx.browser.take_screenshot(&page.tab_id).await {
            Ok(bytes) => {
                ctx.narrator
                    .message(Role::Narration, format!("captured screenshot of {}", page.url), "screenshot_tool");
                Ok(ToolResultEnvelope::success(serde_json::json!({
                    "tabId": page.tab_id,
                    "bytes": bytes.len(),
                })))
            }
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
    async fn screenshot_reports_tab_and_byte_count() {
        let browser = StubBrowserContext::new();
        let narrator = Narrator::default();
        let ctx = ToolCallContext::new(&browser, &narrator, &[]);
        let result = ScreenshotTool.call(serde_json::json!({}), &ctx).await.unwrap();
        assert!(result.ok);
        assert_eq!(result.output["bytes"], 0);
    }
}
