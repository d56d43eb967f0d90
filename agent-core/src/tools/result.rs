//! `result_tool`: records the final human-readable summary of a completed task
//! (SPEC_FULL.md §4.11 Finalisation).

use async_trait::async_trait;
use serde_json::Value;

use crate::pubsub::Role;

use super::{Tool, ToolCallContext, ToolResultEnvelope, ToolSourceError, ToolSpec, TOOL_RESULT};

pub struct ResultTool;

#[async_trait]
impl Tool for ResultTool {
    fn name(&self) -> &str {
        TOOL_RESULT
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name().to_string(),
            description: "Records the final summary of what was accomplished.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {"summary": {"type": "string"}},
                "required": ["summary"]
            }),
        }
    }

    async fn call(
        &self,
        args: Value,
        ctx: &ToolCallContext<'_>,
    ) -> Result<ToolResultEnvelope, ToolSourceError> {
        let summary = args
            .get("summary")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        ctx.narrator.message(Role::Assistant, &summary, "result_tool");
        Ok(ToolResultEnvelope::success(Value::String(summary)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::StubBrowserContext;
    use crate::pubsub::Narrator;

    #[tokio::test]
    async fn call_echoes_summary_as_output() {
        let browser = StubBrowserContext::new();
        let narrator = Narrator::default();
        let ctx = ToolCallContext::new(&browser, &narrator, &[]);
        let result = ResultTool
            .call(serde_json::json!({"summary": "added toothpaste to cart"}), &ctx)
            .await
            .unwrap();
        assert_eq!(result.output, "added toothpaste to cart");
    }
}
