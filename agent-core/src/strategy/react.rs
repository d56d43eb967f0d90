//! `ReAct` strategy (SPEC_FULL.md §4.7): an outer validation loop wrapping an inner
//! Observe → Think → Act cycle loop, the alternate complex-task strategy selected by
//! `StrategyMode::React` (SPEC_FULL.md §11 decided open question).

use agent_config::AgentConfig;
use uuid::Uuid;

use crate::error::AgentError;
use crate::human_input::{wait_for_human_input, HumanInputSource};
use crate::loop_detector::{detect_loop, LoopDetectorConfig};
use crate::message::Message;
use crate::state::{Cycle, ExecutionContext, ReactState};
use crate::tools::{
    decode_double_encoded, ToolCallContext, TOOL_DONE, TOOL_HUMAN_INPUT, TOOL_REFRESH_BROWSER_STATE,
    TOOL_REQUIRE_PLANNING, TOOL_SCREENSHOT, TOOL_VALIDATOR,
};
use crate::turn::{processor::process_tool_calls, processor::ProcessorSignals, run_turn};

use super::{browser_tools_plus, StrategyOutcome};

/// Number of recent cycles kept in `ReactState`'s ring buffer and fed back into the Think prompt.
const REACT_STATE_CAPACITY: usize = 5;

pub async fn run_react(
    ctx: &mut ExecutionContext,
    config: &AgentConfig,
    human_input: &dyn HumanInputSource,
) -> Result<StrategyOutcome, AgentError> {
    let mut state = ReactState::new(ctx.task.clone(), REACT_STATE_CAPACITY);

    for _attempt in 0..config.max_validation_attempts {
        if ctx.is_cancelled() {
            return Err(AgentError::Cancelled);
        }

        run_cycles(ctx, config, human_input, &mut state).await?;

        let (is_complete, reasoning) = validate(ctx).await?;
        if is_complete {
            return Ok(StrategyOutcome::new(reasoning));
        }

        state.refine_focus(format!(
            "{reasoning} (working toward: {})",
            state.ultimate_goal
        ));
        ctx.message_log.push(Message::Reminder {
            content: format!(
                "Validation found the task is not yet complete: {reasoning}. Continue working \
                 toward the original goal."
            ),
        });
    }

    Err(AgentError::TurnBudgetExhausted {
        strategy: "react-validate",
        limit: config.max_validation_attempts,
    })
}

/// Runs Observe/Think/Act cycles until one calls `done_tool`, a loop is detected, or the cycle
/// budget is exhausted — any of which hands control back to the outer validation step rather
/// than failing the run (SPEC_FULL.md §4.9: ReAct treats a detected loop as a break, not fatal).
async fn run_cycles(
    ctx: &mut ExecutionContext,
    config: &AgentConfig,
    human_input: &dyn HumanInputSource,
    state: &mut ReactState,
) -> Result<(), AgentError> {
    let loop_config = LoopDetectorConfig {
        lookback: config.loop_lookback,
        threshold: config.loop_threshold,
    };

    for _ in 0..config.max_react_cycles {
        if ctx.is_cancelled() {
            return Err(AgentError::Cancelled);
        }
        if detect_loop(&ctx.message_log, loop_config) {
            return Ok(());
        }

        let observation = observe(ctx, state).await?;
        let (reasoning, tool_name) = think(ctx, state, &observation).await?;
        let signals = act(ctx, config, human_input, &tool_name, &reasoning).await?;
        let success = !signals.require_planning_called;

        state.record(Cycle {
            observation,
            thought: reasoning,
            action: tool_name,
        });

        if signals.done_called {
            return Ok(());
        }
        if !success {
            let refined = refine_focus(ctx, state).await?;
            state.refine_focus(refined);
        }
    }
    Ok(())
}

/// Observe: screenshot + a fresh browser-state snapshot, then a short textual explanation of
/// what they show relative to `state.current_focus`.
async fn observe(ctx: &mut ExecutionContext, state: &ReactState) -> Result<String, AgentError> {
    let recent = ctx.message_log.messages().to_vec();
    let call_ctx = ToolCallContext::new(ctx.browser.as_ref(), &ctx.narrator, &recent);

    ctx.tools
        .call(TOOL_SCREENSHOT, serde_json::json!({}), &call_ctx)
        .await?;
    let browser_state_envelope = ctx
        .tools
        .call(TOOL_REFRESH_BROWSER_STATE, serde_json::json!({}), &call_ctx)
        .await?;
    let decoded = decode_double_encoded(&browser_state_envelope.output);
    let browser_state = decoded
        .as_str()
        .map(str::to_string)
        .unwrap_or_else(|| decoded.to_string());
    ctx.message_log.replace_browser_state(browser_state.clone());

    let prompt = format!(
        "Current focus: {}\n\nBrowser state:\n{browser_state}\n\nIn one or two sentences, \
         explain the current state of the page relevant to the current focus.",
        state.current_focus
    );
    let response = ctx.llm.invoke(&[Message::human(prompt)], &[]).await?;
    ctx.narrator
        .thinking(&response.content, Uuid::new_v4().to_string());
    Ok(response.content)
}

/// Think: structured-output call picking the single next tool to act with.
async fn think(
    ctx: &mut ExecutionContext,
    state: &ReactState,
    observation: &str,
) -> Result<(String, String), AgentError> {
    let available_tools = ctx.tools.get_descriptions().await;
    let history = state
        .cycles()
        .map(|c| format!("- observed: {}\n  thought: {}\n  action: {}", c.observation, c.thought, c.action))
        .collect::<Vec<_>>()
        .join("\n");
    let prompt = format!(
        "Ultimate goal: {}\nCurrent focus: {}\nLatest observation: {observation}\n\n\
         Recent cycles:\n{history}\n\nAvailable tools:\n{available_tools}\n\n\
         Pick the single next tool to call and explain why.",
        state.ultimate_goal, state.current_focus
    );
    let schema = serde_json::json!({
        "type": "object",
        "properties": {
            "reasoning": {"type": "string"},
            "toolName": {"type": "string"}
        },
        "required": ["reasoning", "toolName"]
    });
    let value = ctx.llm.invoke_structured(&prompt, &schema).await?;
    let reasoning = value
        .get("reasoning")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    let tool_name = value
        .get("toolName")
        .and_then(|v| v.as_str())
        .unwrap_or(TOOL_DONE)
        .to_string();
    ctx.narrator.thinking(&reasoning, Uuid::new_v4().to_string());
    Ok((reasoning, tool_name))
}

/// Act: binds only the chosen tool plus the always-available control-flow tools, nudges the LLM
/// to call it, and runs the resulting tool calls through the shared tool-call processor.
async fn act(
    ctx: &mut ExecutionContext,
    config: &AgentConfig,
    human_input: &dyn HumanInputSource,
    tool_name: &str,
    reasoning: &str,
) -> Result<ProcessorSignals, AgentError> {
    let tool_names = [tool_name, TOOL_DONE, TOOL_HUMAN_INPUT, TOOL_REQUIRE_PLANNING];
    let tools = ctx.tools.specs_for(&tool_names).await;

    ctx.message_log.push(Message::Reminder {
        content: format!("Call the tool `{tool_name}` now to act on: {reasoning}"),
    });

    let calls = run_turn(ctx, &tools).await?;
    if calls.is_empty() {
        return Ok(ProcessorSignals::default());
    }

    let signals = process_tool_calls(ctx, &calls).await?;
    if let Some(request_id) = signals.human_input_requested.clone() {
        wait_for_human_input(
            ctx,
            human_input,
            &request_id,
            config.human_input_timeout,
            config.human_input_check_interval,
        )
        .await?;
    }
    Ok(signals)
}

/// Asks the LLM to narrow `current_focus` after a cycle whose action needed replanning.
async fn refine_focus(ctx: &mut ExecutionContext, state: &ReactState) -> Result<String, AgentError> {
    let prompt = format!(
        "The last action toward the goal \"{}\" needed replanning. Current focus was: {}\n\n\
         Suggest a narrower, more concrete current focus for the next cycle, in one sentence.",
        state.ultimate_goal, state.current_focus
    );
    let response = ctx.llm.invoke(&[Message::human(prompt)], &[]).await?;
    Ok(response.content)
}

async fn validate(ctx: &mut ExecutionContext) -> Result<(bool, String), AgentError> {
    let tools = ctx.tools.specs_for(&[TOOL_VALIDATOR]).await;
    let calls = run_turn(ctx, &tools).await?;
    if calls.is_empty() {
        return Ok((false, "no validator call made".to_string()));
    }
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
    let envelope = crate::tools::ToolResultEnvelope::from_json_str(&last_tool_content);
    let decoded = envelope
        .map(|e| decode_double_encoded(&e.output))
        .unwrap_or(serde_json::Value::Null);
    let is_complete = decoded.get("isComplete").and_then(|v| v.as_bool()).unwrap_or(false);
    let reasoning = decoded
        .get("reasoning")
        .and_then(|v| v.as_str())
        .unwrap_or("validated")
        .to_string();
    Ok((is_complete, reasoning))
}

/// Names available to the ReAct Think step: every browser tool plus `require_planning_tool`,
/// which a cycle's Act step may also be asked to call.
#[allow(dead_code)]
pub(crate) fn react_tool_names() -> Vec<&'static str> {
    browser_tools_plus(&[TOOL_REQUIRE_PLANNING])
}
