//! `classification_tool`: asks the LLM to classify the task up front (SPEC_FULL.md §4.4).
//!
//! Double-encoded output: `{ "is_simple_task": bool, "is_followup_task": bool }` serialised as a
//! JSON string inside `output`, matching how the classifier's own structured call answers.

use async_trait::async_trait;
use serde_json::Value;

use super::{Tool, ToolCallContext, ToolResultEnvelope, ToolSourceError, ToolSpec, TOOL_CLASSIFICATION};

pub struct ClassificationTool;

#[async_trait]
impl Tool for ClassificationTool {
    fn name(&self) -> &str {
        TOOL_CLASSIFICATION
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name().to_string(),
            description: "Records whether the task is a simple single-step task and whether it \
                is a followup to a prior task."
                .to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "is_simple_task": {"type": "boolean"},
                    "is_followup_task": {"type": "boolean"}
                },
                "required": ["is_simple_task", "is_followup_task"]
            }),
        }
    }

    async fn call(
        &self,
        args: Value,
        _ctx: &ToolCallContext<'_>,
    ) -> Result<ToolResultEnvelope, ToolSourceError> {
        let is_simple_task = args.get("is_simple_task").and_then(Value::as_bool).unwrap_or(false);
        let is_followup_task = args
            .get("is_followup_task")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let encoded = serde_json::json!({
            "is_simple_task": is_simple_task,
            "is_followup_task": is_followup_task,
        })
        .to_string();
        Ok(ToolResultEnvelope::success(Value::String(encoded)))
    }
}
