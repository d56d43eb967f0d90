//! Classifier (SPEC_FULL.md §4.4): decides whether a task is simple enough for `SimpleTask`, and
//! whether it is a followup to a prior completed task, by driving `classification_tool` through
//! the same turn/processor pipeline every other control-flow tool (`done_tool`, `validator_tool`,
//! `planner_tool`, `todo_manager_tool`) goes through, rather than a separate structured-output
//! call.

use serde::{Deserialize, Serialize};

use crate::error::AgentError;
use crate::message::Message;
use crate::state::ExecutionContext;
use crate::tools::{decode_double_encoded, ToolResultEnvelope, TOOL_CLASSIFICATION};
use crate::turn::{processor::process_tool_calls, run_turn};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Classification {
    pub is_simple_task: bool,
    pub is_followup_task: bool,
}

/// Classifies `ctx.task`, given the prior task's summary if this run follows one (SPEC_FULL.md
/// §4.4 followup detection). The classification prompt and its tool call/result are appended to
/// the log like any other turn, then truncated back off once the decision is read, so the
/// classifier leaves no trace in the conversation the chosen strategy goes on to see. A malformed
/// or missing field, or the LLM declining to call the tool at all, defaults to `false`/`false`
/// rather than failing the whole run — classification only picks a strategy, it is never itself
/// fatal.
pub async fn classify(
    ctx: &mut ExecutionContext,
    previous_task_summary: Option<&str>,
) -> Result<Classification, AgentError> {
    let prompt = match previous_task_summary {
        Some(summary) => format!(
            "Classify this task with `classification_tool`. Previous task summary: {summary}\n\n\
             Task: {}\n\nDecide: is this a simple, single-step task? Is it a followup to the \
             previous task?",
            ctx.task
        ),
        None => format!(
            "Classify this task with `classification_tool`.\n\nTask: {}\n\nDecide: is this a \
             simple, single-step task? Is it a followup to a previous task?",
            ctx.task
        ),
    };

    let checkpoint = ctx.message_log.len();
    ctx.message_log.push(Message::human(prompt));

    let tools = ctx.tools.specs_for(&[TOOL_CLASSIFICATION]).await;
    let calls = run_turn(ctx, &tools).await?;

    let classification = if calls.is_empty() {
        Classification {
            is_simple_task: false,
            is_followup_task: false,
        }
    } else {
        process_tool_calls(ctx, &calls).await?;
        let last_tool_content = ctx
            .message_log
            .messages()
            .iter()
            .rev()
            .find_map(|m| match m {
                Message::Tool { content, .. } => Some(content.clone()),
                _ => None,
            })
            .unwrap_or_default();
        let decoded = ToolResultEnvelope::from_json_str(&last_tool_content)
            .map(|e| decode_double_encoded(&e.output))
            .unwrap_or(serde_json::Value::Null);
        Classification {
            is_simple_task: decoded.get("is_simple_task").and_then(|v| v.as_bool()).unwrap_or(false),
            is_followup_task: decoded
                .get("is_followup_task")
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
        }
    };

    ctx.message_log.truncate(checkpoint);
    Ok(classification)
}
