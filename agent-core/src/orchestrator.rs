//! Agent orchestrator (SPEC_FULL.md §2 data flow, §4.4 classifier, §4.8 predefined plans,
//! §4.11 finalisation): the entry point that drives one task through classification, strategy
//! dispatch, finalisation, and cleanup around one `ExecutionContext`.

use agent_config::{AgentConfig, StrategyMode};

use crate::classifier::{classify, Classification};
use crate::error::AgentError;
use crate::human_input::HumanInputSource;
use crate::state::{ExecutionContext, PredefinedPlan, TodoList};
use crate::strategy::{
    run_multistep, run_multistep_with_initial_plan, run_react, run_simple_task,
    SimpleTaskOutcome,
};
use crate::tools::{ToolCallContext, TOOL_RESULT};

const SYSTEM_PROMPT: &str = "You are an autonomous browser-automation agent. Use the tools \
    available to you to complete the user's task, observing the page before and after every \
    action you take.";

/// What one `run_agent` call produces once finalisation has run.
#[derive(Debug, Clone)]
pub struct AgentRunOutcome {
    pub summary: String,
}

/// A strategy named explicitly by a caller, bypassing the classifier (`agent-cli`'s `--mode`
/// flag uses this to make a run reproducible from the command line instead of depending on
/// `classification_tool`'s judgment).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForcedMode {
    Simple,
    MultiStep,
    React,
}

/// Drives `ctx.task` to completion.
///
/// Classifies the task (unless `predefined_plan` bypasses classification entirely per
/// SPEC_FULL.md §4.8, or `forced_mode` names a strategy directly), clears and reinitialises
/// history unless this run is a followup, dispatches to `SimpleTask` and escalates into the
/// configured complex-task strategy on `require_planning_tool`, finalises via `result_tool` on
/// success, emits an `execution_error` metric on a real failure, and always runs cleanup —
/// whichever of those paths is taken.
#[allow(clippy::too_many_arguments)]
pub async fn run_agent(
    ctx: &mut ExecutionContext,
    config: &AgentConfig,
    human_input: &dyn HumanInputSource,
    previous_task_summary: Option<&str>,
    predefined_plan: Option<&PredefinedPlan>,
    forced_mode: Option<ForcedMode>,
) -> Result<AgentRunOutcome, AgentError> {
    let outcome = run_inner(
        ctx,
        config,
        human_input,
        previous_task_summary,
        predefined_plan,
        forced_mode,
    )
    .await;

    match &outcome {
        Ok(result) => finalize_success(ctx, &result.summary).await,
        Err(err) if !err.is_cancellation_like() => emit_execution_error(ctx, config, err),
        Err(_) => {}
    }
    cleanup(ctx).await;

    outcome
}

#[allow(clippy::too_many_arguments)]
async fn run_inner(
    ctx: &mut ExecutionContext,
    config: &AgentConfig,
    human_input: &dyn HumanInputSource,
    previous_task_summary: Option<&str>,
    predefined_plan: Option<&PredefinedPlan>,
    forced_mode: Option<ForcedMode>,
) -> Result<AgentRunOutcome, AgentError> {
    if let Some(plan) = predefined_plan {
        ctx.task = plan.goal.clone();
        ctx.agent_id = plan.agent_id.clone();
        ctx.message_log.init(SYSTEM_PROMPT, ctx.task.clone());
        let markdown = TodoList::from_plan_steps(plan.steps.iter().map(|s| s.action.clone())).to_markdown();
        let outcome = run_multistep_with_initial_plan(ctx, config, human_input, &markdown).await?;
        return Ok(AgentRunOutcome { summary: outcome.summary });
    }

    if let Some(mode) = forced_mode {
        let task = ctx.task.clone();
        ctx.message_log.init(SYSTEM_PROMPT, task);
        let summary = run_forced_mode(ctx, config, human_input, mode).await?;
        return Ok(AgentRunOutcome { summary });
    }

    let classification = classify(ctx, previous_task_summary)
        .await
        .unwrap_or(Classification {
            is_simple_task: false,
            is_followup_task: false,
        });

    if !classification.is_followup_task {
        let task = ctx.task.clone();
        ctx.message_log.init(SYSTEM_PROMPT, task);
    }

    if classification.is_simple_task {
        if let SimpleTaskOutcome::Completed(result) = run_simple_task(ctx, config, human_input).await? {
            return Ok(AgentRunOutcome { summary: result.summary });
        }
    }

    let outcome = match config.strategy_mode {
        StrategyMode::MultiStep => run_multistep(ctx, config, human_input).await?,
        StrategyMode::React => run_react(ctx, config, human_input).await?,
    };
    Ok(AgentRunOutcome { summary: outcome.summary })
}

async fn run_forced_mode(
    ctx: &mut ExecutionContext,
    config: &AgentConfig,
    human_input: &dyn HumanInputSource,
    mode: ForcedMode,
) -> Result<String, AgentError> {
    match mode {
        ForcedMode::Simple => match run_simple_task(ctx, config, human_input).await? {
            SimpleTaskOutcome::Completed(result) => Ok(result.summary),
            SimpleTaskOutcome::NeedsPlanning => {
                Ok(run_multistep(ctx, config, human_input).await?.summary)
            }
        },
        ForcedMode::MultiStep => Ok(run_multistep(ctx, config, human_input).await?.summary),
        ForcedMode::React => Ok(run_react(ctx, config, human_input).await?.summary),
    }
}

/// Invokes `result_tool` directly so a run that completed via `done_tool` or validator approval
/// (rather than the LLM itself calling `result_tool`) still gets a recorded, user-facing summary.
async fn finalize_success(ctx: &mut ExecutionContext, summary: &str) {
    let recent = ctx.message_log.messages().to_vec();
    let call_ctx = ToolCallContext::new(ctx.browser.as_ref(), &ctx.narrator, &recent);
    let _ = ctx
        .tools
        .call(TOOL_RESULT, serde_json::json!({ "summary": summary }), &call_ctx)
        .await;
}

fn emit_execution_error(ctx: &ExecutionContext, config: &AgentConfig, err: &AgentError) {
    let mode = match config.strategy_mode {
        StrategyMode::MultiStep => "multistep",
        StrategyMode::React => "react",
    };
    let truncated_task: String = ctx.task.chars().take(200).collect();
    ctx.narrator.custom(serde_json::json!({
        "type": "execution_error",
        "error": err.to_string(),
        "errorType": error_type_name(err),
        "task": truncated_task,
        "mode": mode,
        "agent": ctx.agent_id,
    }));
}

fn error_type_name(err: &AgentError) -> &'static str {
    match err {
        AgentError::Cancelled => "cancelled",
        AgentError::TurnBudgetExhausted { .. } => "turn_budget_exhausted",
        AgentError::LoopDetected { .. } => "loop_detected",
        AgentError::LlmProtocolViolation(_) => "llm_protocol_violation",
        AgentError::HumanInputTimedOut => "human_input_timed_out",
        AgentError::HumanInputAborted => "human_input_aborted",
        AgentError::ToolSource(_) => "tool_source",
        AgentError::ExecutionFailed(_) => "execution_failed",
    }
}

/// Stops any page-glow effect still active on a tab touched during the run. Narrator subscriptions
/// have nothing further to detach here: the orchestrator never holds a `Receiver` of its own, only
/// the `Sender` handle threaded through `ExecutionContext`, so a caller's subscription outlives
/// this call and is only closed once every clone of that handle is dropped.
async fn cleanup(ctx: &ExecutionContext) {
    if let Ok(tabs) = ctx.browser.list_tabs().await {
        for tab in tabs {
            if ctx.glow.is_active(&tab.tab_id) {
                ctx.glow.stop(&ctx.narrator, tab.tab_id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::browser::StubBrowserContext;
    use crate::human_input::HumanInputResolution;
    use crate::llm::mock::{MockLlm, ScriptedTurn};
    use crate::message::ToolCall;
    use crate::pubsub::{Narrator, UiEvent};
    use crate::state::plan::PlanStep;
    use crate::tools::{
        ClassificationTool, DoneTool, NavigationTool, PlannerTool, RequirePlanningTool, ResultTool,
        ToolRegistry, ToolRegistryLocked, ValidatorTool,
    };

    struct NoHumanInput;
    #[async_trait::async_trait]
    impl HumanInputSource for NoHumanInput {
        async fn poll(&self, _request_id: &str) -> Option<HumanInputResolution> {
            Some(HumanInputResolution::Done("n/a".to_string()))
        }
    }

    fn test_registry() -> ToolRegistryLocked {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(ClassificationTool));
        registry.register(Box::new(PlannerTool));
        registry.register(Box::new(NavigationTool));
        registry.register(Box::new(DoneTool));
        registry.register(Box::new(RequirePlanningTool));
        registry.register(Box::new(ResultTool));
        registry.register(Box::new(ValidatorTool));
        ToolRegistryLocked::new(registry)
    }

    fn test_context(llm: MockLlm) -> ExecutionContext {
        ExecutionContext::new(
            "buy toothpaste",
            "agent-1",
            Arc::new(llm),
            Arc::new(StubBrowserContext::new()),
            test_registry(),
            Narrator::default(),
        )
    }

    fn classify_call(id: &str, is_simple_task: bool, is_followup_task: bool) -> ScriptedTurn {
        ScriptedTurn {
            content: "".to_string(),
            tool_calls: vec![ToolCall {
                id: id.to_string(),
                name: "classification_tool".to_string(),
                args: serde_json::json!({
                    "is_simple_task": is_simple_task,
                    "is_followup_task": is_followup_task,
                }),
            }],
        }
    }

    #[tokio::test]
    async fn simple_task_completes_and_finalizes_with_result_tool() {
        let llm = MockLlm::scripted(vec![
            classify_call("cls-1", true, false),
            ScriptedTurn {
                content: "".to_string(),
                tool_calls: vec![ToolCall {
                    id: "c1".to_string(),
                    name: "done_tool".to_string(),
                    args: serde_json::json!({"reason": "toothpaste added to cart"}),
                }],
            },
        ]);
        let mut ctx = test_context(llm);
        let mut rx = ctx.narrator.subscribe();
        let config = AgentConfig::default();

        let outcome = run_agent(&mut ctx, &config, &NoHumanInput, None, None, None)
            .await
            .unwrap();
        assert_eq!(outcome.summary, "toothpaste added to cart");

        let mut saw_assistant = false;
        while let Ok(event) = rx.try_recv() {
            if let UiEvent::Message {
                role: crate::pubsub::Role::Assistant,
                ..
            } = event
            {
                saw_assistant = true;
            }
        }
        assert!(saw_assistant);
    }

    #[tokio::test]
    async fn non_followup_classification_reinitialises_history() {
        let llm = MockLlm::scripted(vec![
            classify_call("cls-1", true, false),
            ScriptedTurn {
                content: "nothing left to do".to_string(),
                tool_calls: vec![],
            },
        ]);
        let mut ctx = test_context(llm);
        ctx.message_log.push(crate::message::Message::human("stale leftover message"));
        let config = AgentConfig::default();

        run_agent(&mut ctx, &config, &NoHumanInput, None, None, None).await.unwrap();
        assert!(!ctx
            .message_log
            .messages()
            .iter()
            .any(|m| m.content() == "stale leftover message"));
    }

    #[tokio::test]
    async fn classifier_failure_falls_back_to_complex_non_followup() {
        // The classification turn calls no tool at all, so `classify` defaults both flags to
        // false, routing straight into the complex strategy.
        let llm = MockLlm::scripted(vec![
            ScriptedTurn {
                content: "not sure how to classify this".to_string(),
                tool_calls: vec![],
            },
            ScriptedTurn {
                content: "".to_string(),
                tool_calls: vec![ToolCall {
                    id: "plan-1".to_string(),
                    name: "planner_tool".to_string(),
                    args: serde_json::json!({"steps": [{"action": "search item", "reasoning": "find it"}]}),
                }],
            },
            ScriptedTurn {
                content: "".to_string(),
                tool_calls: vec![ToolCall {
                    id: "work-1".to_string(),
                    name: "done_tool".to_string(),
                    args: serde_json::json!({"reason": "item found"}),
                }],
            },
            ScriptedTurn {
                content: "".to_string(),
                tool_calls: vec![ToolCall {
                    id: "validate-1".to_string(),
                    name: "validator_tool".to_string(),
                    args: serde_json::json!({"isComplete": true, "reasoning": "task finished"}),
                }],
            },
        ]);
        let mut ctx = test_context(llm);
        let config = AgentConfig::default();

        let outcome = run_agent(&mut ctx, &config, &NoHumanInput, None, None, None)
            .await
            .unwrap();
        assert_eq!(outcome.summary, "task finished");
    }

    #[tokio::test]
    async fn predefined_plan_skips_classifier_and_seeds_todo_list() {
        let llm = MockLlm::scripted(vec![
            ScriptedTurn {
                content: "".to_string(),
                tool_calls: vec![ToolCall {
                    id: "work-1".to_string(),
                    name: "done_tool".to_string(),
                    args: serde_json::json!({"reason": "checked out"}),
                }],
            },
            ScriptedTurn {
                content: "".to_string(),
                tool_calls: vec![ToolCall {
                    id: "validate-1".to_string(),
                    name: "validator_tool".to_string(),
                    args: serde_json::json!({"isComplete": true, "reasoning": "done"}),
                }],
            },
        ]);
        let mut ctx = test_context(llm);
        let config = AgentConfig::default();
        let plan = PredefinedPlan {
            steps: vec![PlanStep {
                action: "go to checkout".to_string(),
                reasoning: "last step".to_string(),
            }],
            goal: "complete the predefined checkout flow".to_string(),
            name: Some("checkout".to_string()),
            agent_id: "agent-predefined".to_string(),
        };

        let outcome = run_agent(&mut ctx, &config, &NoHumanInput, None, Some(&plan), None)
            .await
            .unwrap();
        assert_eq!(outcome.summary, "done");
        assert_eq!(ctx.agent_id, "agent-predefined");
    }

    #[tokio::test]
    async fn failure_emits_execution_error_metric() {
        let llm = MockLlm::scripted(vec![
            classify_call("cls-1", true, false),
            ScriptedTurn {
                content: "".to_string(),
                tool_calls: vec![ToolCall {
                    id: "c1".to_string(),
                    name: "nonexistent_tool".to_string(),
                    args: serde_json::json!({}),
                }],
            },
        ]);
        let mut ctx = test_context(llm);
        let mut rx = ctx.narrator.subscribe();
        let config = AgentConfig::default();

        let result = run_agent(&mut ctx, &config, &NoHumanInput, None, None, None).await;
        assert!(result.is_err());

        let mut saw_error_metric = false;
        while let Ok(event) = rx.try_recv() {
            if let UiEvent::Custom { value } = event {
                if value.get("type").and_then(|v| v.as_str()) == Some("execution_error") {
                    saw_error_metric = true;
                }
            }
        }
        assert!(saw_error_metric);
    }

    #[tokio::test]
    async fn cleanup_stops_glow_left_active_on_touched_tabs() {
        let llm = MockLlm::scripted(vec![
            classify_call("cls-1", true, false),
            ScriptedTurn {
                content: "".to_string(),
                tool_calls: vec![ToolCall {
                    id: "c1".to_string(),
                    name: "done_tool".to_string(),
                    args: serde_json::json!({"reason": "done"}),
                }],
            },
        ]);
        let mut ctx = test_context(llm);
        ctx.glow.start(&ctx.narrator, "tab-0".to_string());
        let config = AgentConfig::default();

        run_agent(&mut ctx, &config, &NoHumanInput, None, None, None).await.unwrap();
        assert!(!ctx.glow.is_active("tab-0"));
    }

    #[tokio::test]
    async fn forced_mode_skips_classifier_entirely() {
        // Only one turn is scripted, a `done_tool` call. If the classifier were consulted it
        // would consume this turn first and `run_simple_task` would see nothing left to call,
        // so reaching "forced simple path" proves the bypass held.
        let llm = MockLlm::scripted(vec![ScriptedTurn {
            content: "".to_string(),
            tool_calls: vec![ToolCall {
                id: "c1".to_string(),
                name: "done_tool".to_string(),
                args: serde_json::json!({"reason": "forced simple path"}),
            }],
        }]);
        let mut ctx = test_context(llm);
        let config = AgentConfig::default();

        let outcome = run_agent(
            &mut ctx,
            &config,
            &NoHumanInput,
            None,
            None,
            Some(ForcedMode::Simple),
        )
        .await
        .unwrap();
        assert_eq!(outcome.summary, "forced simple path");
    }
}
