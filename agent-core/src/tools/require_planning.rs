//! `require_planning_tool`: a control-flow tool the LLM calls mid-task when it decides the
//! remaining work needs a full plan after all (SPEC_FULL.md §4.5 SimpleTask escalation path).

use async_trait::async_trait;
use serde_json::Value;

use super::{Tool, ToolCallContext, ToolResultEnvelope, ToolSourceError, ToolSpec, TOOL_REQUIRE_PLANNING};

pub struct RequirePlanningTool;

#[async_trait]
impl Tool for RequirePlanningTool {
    fn name(&self) -> &str {
        TOOL_REQUIRE_PLANNING
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name().to_string(),
            description: "Escalates a simple task to multi-step planning when the remaining \
                work turns out to need a plan."
                .to_string(),
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
            .unwrap_or("task needs a plan")
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
    async fn call_returns_given_reason() {
        let browser = StubBrowserContext::new();
        let narrator = Narrator::default();
        let ctx = ToolCallContext::new(&browser, &narrator, &[]);
        let result = RequirePlanningTool
            .call(serde_json::json!({"reason": "checkout has five steps"}), &ctx)
            .await
            .unwrap();
        assert_eq!(result.output, "checkout has five steps");
    }
}
