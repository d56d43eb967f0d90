//! Tool-Call Processor (SPEC_FULL.md §4.3): executes every tool call from one AI turn, glows the
//! page around visible tools, and appends one `tool` message per call before the next turn runs.

use uuid::Uuid;

use crate::error::AgentError;
use crate::message::ToolCall;
use crate::state::ExecutionContext;
use crate::tools::{
    decode_double_encoded, ToolCallContext, ToolResultEnvelope, GLOW_ENABLED_TOOLS, TOOL_DONE,
    TOOL_HUMAN_INPUT, TOOL_REFRESH_BROWSER_STATE, TOOL_REQUIRE_PLANNING, TOOL_RESULT,
    TOOL_TODO_MANAGER,
};

/// Signals a strategy reads off tool output to decide what happens next, distinct from the plain
/// tool-result text that goes into the message log either way.
#[derive(Debug, Clone, Default)]
pub struct ProcessorSignals {
    pub done_called: bool,
    pub require_planning_called: bool,
    pub human_input_requested: Option<String>,
    pub todo_list_markdown: Option<String>,
    pub result_summary: Option<String>,
    pub browser_state_refreshed: Option<String>,
}

/// Runs every tool call in `calls`, in order, against the context's registry, appending one
/// `tool` message per call and returning the control-flow signals a strategy needs.
///
/// Tools never raise `AgentError` for their own failures (SPEC_FULL.md §11: a tool self-surfaces
/// failure and returns `ok:false`); only `ToolSourceError` (no such tool registered, a transport
/// failure) escalates here, since the orchestrator — not the tool — decides whether that is fatal.
pub async fn process_tool_calls(
    ctx: &mut ExecutionContext,
    calls: &[ToolCall],
) -> Result<ProcessorSignals, AgentError> {
    let mut signals = ProcessorSignals::default();

    for call in calls {
        if ctx.is_cancelled() {
            return Err(AgentError::Cancelled);
        }

        let glow = GLOW_ENABLED_TOOLS.contains(&call.name.as_str());
        let current_tab = if glow {
            ctx.browser.get_current_page().await.ok()
        } else {
            None
        };
        if let Some(page) = &current_tab {
            ctx.glow.start(&ctx.narrator, page.tab_id.clone());
        }

        let recent = ctx.message_log.messages().to_vec();
        let call_ctx = ToolCallContext::new(ctx.browser.as_ref(), &ctx.narrator, &recent);
        let envelope = ctx.tools.call(&call.name, call.args.clone(), &call_ctx).await?;

        if let Some(page) = &current_tab {
            ctx.glow.stop(&ctx.narrator, page.tab_id.clone());
        }

        record_signals(&mut signals, call, &envelope);
        ctx.message_log
            .push_tool_result(call.id.clone(), envelope.to_json_string());

        if call.name == TOOL_REFRESH_BROWSER_STATE && envelope.ok {
            let decoded = decode_double_encoded(&envelope.output);
            let full_state = decoded.as_str().map(str::to_string).unwrap_or_else(|| decoded.to_string());
            ctx.message_log.replace_browser_state(full_state.clone());
            signals.browser_state_refreshed = Some(full_state);
            let summary = "[browser state refreshed; see browser_state message]".to_string();
            ctx.message_log.summarize_tool_result(&call.id, summary);
        }

        if let Some(request_id) = &signals.human_input_requested {
            ctx.pending_human_input = Some(request_id.clone());
            break;
        }
    }

    if let Some(markdown) = &signals.todo_list_markdown {
        ctx.message_log.replace_todo_list(markdown.clone());
        ctx.narrator.thinking(markdown, Uuid::new_v4().to_string());
    }

    Ok(signals)
}

fn record_signals(signals: &mut ProcessorSignals, call: &ToolCall, envelope: &ToolResultEnvelope) {
    match call.name.as_str() {
        TOOL_DONE => signals.done_called = true,
        TOOL_REQUIRE_PLANNING => signals.require_planning_called = true,
        TOOL_HUMAN_INPUT => {
            if envelope.ok {
                if let Some(request_id) = envelope.output.get("requestId").and_then(|v| v.as_str()) {
                    signals.human_input_requested = Some(request_id.to_string());
                }
            }
        }
        TOOL_RESULT => {
            if envelope.ok {
                if let Some(summary) = envelope.output.as_str() {
                    signals.result_summary = Some(summary.to_string());
                }
            }
        }
        TOOL_TODO_MANAGER => {
            if envelope.ok {
                if let Some(markdown) = envelope.output.get("todoList").and_then(|v| v.as_str()) {
                    signals.todo_list_markdown = Some(markdown.to_string());
                }
            }
        }
        _ => {}
    }
}
