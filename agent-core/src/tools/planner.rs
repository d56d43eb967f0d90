//! `planner_tool`: asks the LLM to emit an ordered plan, converted to the initial `TodoList`
//! (SPEC_FULL.md §4.6/§4.8).

use async_trait::async_trait;
use serde_json::Value;

use crate::state::plan::{Plan, PlanStep};
use crate::pubsub::Role;

use super::{Tool, ToolCallContext, ToolResultEnvelope, ToolSourceError, ToolSpec, TOOL_PLANNER};

pub struct PlannerTool;

#[async_trait]
impl Tool for PlannerTool {
    fn name(&self) -> &str {
        TOOL_PLANNER
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name().to_string(),
            description: "Records an ordered plan of steps to accomplish the task.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "steps": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "action": {"type": "string"},
                                "reasoning": {"type": "string"}
                            },
                            "required": ["action", "reasoning"]
                        }
                    }
                },
                "required": ["steps"]
            }),
        }
    }

    async fn call(
        &self,
        args: Value,
        ctx: &ToolCallContext<'_>,
    ) -> Result<ToolResultEnvelope, ToolSourceError> {
        let steps: Vec<PlanStep> = match args.get("steps").cloned() {
            Some(v) => serde_json::from_value(v).map_err(|e| ToolSourceError::InvalidInput {
                tool: self.name().to_string(),
                message: e.to_string(),
            })?,
            None => Vec::new(),
        };
        let plan = Plan::new(steps);
        ctx.narrator
            .plan_update("planned", Some(serde_json::to_value(&plan).unwrap_or(Value::Null)));
        let todo_markdown = plan.to_todo_list().to_markdown();
        ctx.narrator.message(Role::Narration, &todo_markdown, "planner_tool");
        Ok(ToolResultEnvelope::success(serde_json::json!({
            "plan": plan,
            "todoList": todo_markdown,
        })))
    }
}
