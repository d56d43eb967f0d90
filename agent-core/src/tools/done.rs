//! `done_tool`: a control-flow tool the LLM calls to end a ReAct cycle early once it believes
//! the goal is met (SPEC_FULL.md §4.7). Not glow-enabled — it touches no page.

use async_trait::async_trait;
use serde_json::Value;

use super::{Tool, ToolCallContext, ToolResultEnvelope, ToolSourceError, ToolSpec, TOOL_DONE};

pub struct DoneTool;

#[async_trait]
impl Tool for DoneTool {
    fn name(&self) -> &str {
        TOOL_DONE
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name().to_string(),
            description: "Signals that the agent believes the task is complete.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {"reason": {"type": "string"}}
            }),
        }
    }

    async fn call(
        &self,
        args: Value,
        _ctx: &ToolCallContext<'_>,
    ) -> Result<ToolResultEnvelope, ToolSourceError> {
        let reason = args
            .get("reason")
            .and_then(Value::as_str)
            .unwrap_or("task complete")
            .to_string();
        Ok(ToolResultEnvelope::success(Value::String(reason)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::StubBrowserContext;
    use crate::pubsub::Narrator;

    #[tokio::test]
    async fn call_defaults_reason_when_absent() {
        let browser = StubBrowserContext::new();
        let narrator = Narrator::default();
        let ctx = ToolCallContext::new(&browser, &narrator, &[]);
        let result = DoneTool.call(serde_json::json!({}), &ctx).await.unwrap();
        assert_eq!(result.output, "task complete");
    }
}
