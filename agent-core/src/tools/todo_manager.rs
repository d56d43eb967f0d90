//! `todo_manager_tool`: lets the LLM read or rewrite the singleton todo list mid-task
//! (SPEC_FULL.md §3 TodoList / §4.6 MultiStep progress tracking).
//!
//! The tool itself only round-trips markdown; `MessageLog::replace_todo_list` performs the
//! actual singleton-replace. The processor is responsible for calling that after a successful
//! `set`.

use async_trait::async_trait;
use serde_json::Value;

use crate::state::todo_list::TodoList;

use super::{Tool, ToolCallContext, ToolResultEnvelope, ToolSourceError, ToolSpec, TOOL_TODO_MANAGER};

pub struct TodoManagerTool;

#[async_trait]
impl Tool for TodoManagerTool {
    fn name(&self) -> &str {
        TOOL_TODO_MANAGER
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name().to_string(),
            description: "Gets the current todo list or replaces it with a new markdown \
                checklist."
                .to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "action": {"type": "string", "enum": ["get", "set"]},
                    "todoList": {"type": "string"}
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
            "get" => {
                let current = ctx
                    .recent_messages
                    .iter()
                    .rev()
                    .find(|m| m.is_todo_list())
                    .map(|m| m.content().to_string())
                    .unwrap_or_default();
                Ok(ToolResultEnvelope::success(Value::String(current)))
            }
            "set" => {
                let markdown = args
                    .get("todoList")
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                let parsed = TodoList::parse(markdown);
                Ok(ToolResultEnvelope::success(serde_json::json!({
                    "todoList": parsed.to_markdown(),
                    "isComplete": parsed.is_complete(),
                })))
            }
            other => Ok(ToolResultEnvelope::failure(format!("unknown action: {other}"))),
        }
    }
}
