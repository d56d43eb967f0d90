//! `tab_operations_tool`: create, close, or list browser tabs (SPEC_FULL.md §4.1 tool suite).
//! Glow-enabled.

use async_trait::async_trait;
use serde_json::Value;

use super::{Tool, ToolCallContext, ToolResultEnvelope, ToolSourceError, ToolSpec, TOOL_TAB_OPERATIONS};

pub struct TabOperationsTool;

#[async_trait]
impl Tool for TabOperationsTool {
    fn name(&self) -> &str {
        TOOL_TAB_OPERATIONS
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name().to_string(),
            description: "Creates a new tab, closes a tab, or lists all open tabs.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "action": {"type": "string", "enum": ["create", "close", "list"]},
                    "url": {"type": "string"},
                    "tabId": {"type": "string"}
                },
                "required": ["action"]
            }),
        }
    }

    async fn call(
        &self,
        args: Value,
        ctx: &ToolCallContext<'_>,
    ) -> Result<ToolResultEnvelope, ToolSourceError> {
        let action = args.get("action").and_then(Value::as_str).unwrap_or_default();
        match action {
            "create" => {
                let url = args.get("url").and_then(Value::as_str).unwrap_or("about:blank");
                match ctx.browser.create_tab(url).await {
                    Ok(page) => Ok(ToolResultEnvelope::success(serde_json::json!({
                        "tabId": page.tab_id,
                        "url": page.url,
                    }))),
                    Err(e) => Ok(ToolResultEnvelope::failure(e)),
                }
            }
            "close" => {
                let Some(tab_id) = args.get("tabId").and_then(Value::as_str) else {
                    return Ok(ToolResultEnvelope::failure("missing required field: tabId"));
                };
                match ctx.browser.close_tab(tab_id).await {
                    Ok(()) => Ok(ToolResultEnvelope::success(serde_json::json!({"tabId": tab_id}))),
                    Err(e) => Ok(ToolResultEnvelope::failure(e)),
                }
            }
            "list" => match ctx.browser.list_tabs().await {
                Ok(tabs) => {
                    let listed: Vec<Value> = tabs
                        .into_iter()
                        .map(|t| serde_json::json!({"tabId": t.tab_id, "url": t.url, "title": t.title}))
                        .collect();
                    Ok(ToolResultEnvelope::success(Value::Array(listed)))
                }
                Err(e) => Ok(ToolResultEnvelope::failure(e)),
            },
            other => Ok(ToolResultEnvelope::failure(format!("unknown action: {other}"))),
        }
    }
}
