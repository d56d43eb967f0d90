//! `validator_tool`: asks the LLM whether the task is actually complete before finalising
//! (SPEC_FULL.md §4.7 Validate step).

use async_trait::async_trait;
use serde_json::Value;

use super::{Tool, ToolCallContext, ToolResultEnvelope, ToolSourceError, ToolSpec, TOOL_VALIDATOR};

pub struct ValidatorTool;

#[async_trait]
impl Tool for ValidatorTool {
    fn name(&self) -> &str {
        TOOL_VALIDATOR
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name().to_string(),
            description: "Records whether the task is complete, with reasoning and any \
                suggested next steps if not."
                .to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "isComplete": {"type": "boolean"},
                    "reasoning": {"type": "string"},
                    "suggestions": {"type": "array", "items": {"type": "string"}}
                },
                "required": ["isComplete", "reasoning"]
            }),
        }
    }

    async fn call(
        &self,
        args: Value,
        _ctx: &ToolCallContext<'_>,
    ) -> Result<ToolResultEnvelope, ToolSourceError> {
        let is_complete = args.get("isComplete").and_then(Value::as_bool).unwrap_or(false);
        let reasoning = args
            .get("reasoning")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let suggestions: Vec<String> = args
            .get("suggestions")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();
        let encoded = serde_json::json!({
            "isComplete": is_complete,
            "reasoning": reasoning,
            "suggestions": suggestions,
        })
        .to_string();
        Ok(ToolResultEnvelope::success(Value::String(encoded)))
    }
}
