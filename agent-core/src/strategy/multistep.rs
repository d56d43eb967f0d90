//! `MultiStep` strategy (SPEC_FULL.md §4.6): plan, work through the TODO list behind an inner
//! step budget, validate, and replan against the validator's own reasoning if it isn't satisfied,
//! up to an outer step budget.

use agent_config::AgentConfig;
use uuid::Uuid;

use crate::error::AgentError;
use crate::human_input::{wait_for_human_input, HumanInputSource};
use crate::loop_detector::{detect_loop, LoopDetectorConfig};
use crate::message::Message;
use crate::state::ExecutionContext;
use crate::tools::{TOOL_DONE, TOOL_PLANNER, TOOL_VALIDATOR};
use crate::turn::{processor::process_tool_calls, run_turn};

use super::{browser_tools_plus, StrategyOutcome, MULTISTEP_OUTER_EXTRA};

/// Runs the planner tool to seed the `TodoList`, then drives the inner per-turn loop until every
/// item is checked off or the inner budget is exhausted, then validates. If validation reports
/// the task incomplete, replans against its reasoning and tries again, up to `max_outer_steps`
/// total outer iterations.
pub async fn run_multistep(
    ctx: &mut ExecutionContext,
    config: &AgentConfig,
    human_input: &dyn HumanInputSource,
) -> Result<StrategyOutcome, AgentError> {
    run_multistep_outer(ctx, config, human_input, None).await
}

/// Runs the same outer loop as `run_multistep`, but seeds the `TodoList` from a caller-supplied
/// plan instead of calling `planner_tool` on the first iteration (SPEC_FULL.md §4.8
/// `executionMode: predefined`). A replan on a later iteration still goes through `planner_tool`
/// as usual.
pub async fn run_multistep_with_initial_plan(
    ctx: &mut ExecutionContext,
    config: &AgentConfig,
    human_input: &dyn HumanInputSource,
    initial_todo_markdown: &str,
) -> Result<StrategyOutcome, AgentError> {
    run_multistep_outer(ctx, config, human_input, Some(initial_todo_markdown)).await
}

async fn run_multistep_outer(
    ctx: &mut ExecutionContext,
    config: &AgentConfig,
    human_input: &dyn HumanInputSource,
    initial_todo_markdown: Option<&str>,
) -> Result<StrategyOutcome, AgentError> {
    for attempt in 0..config.max_outer_steps {
        if ctx.is_cancelled() {
            return Err(AgentError::Cancelled);
        }

        if attempt == 0 {
            if let Some(markdown) = initial_todo_markdown {
                ctx.message_log.replace_todo_list(markdown.to_string());
                ctx.narrator.thinking(markdown, Uuid::new_v4().to_string());
            } else {
                plan(ctx).await?;
            }
        } else {
            plan(ctx).await?;
        }

        work_through_todo_list(ctx, config, human_input).await?;

        let (is_complete, reasoning) = validate(ctx).await?;
        if is_complete {
            return Ok(StrategyOutcome::new(reasoning));
        }
        ctx.message_log.push(Message::Reminder {
            content: format!(
                "Validation found the task is not yet complete: {reasoning}. Replanning against \
                 the remaining goal."
            ),
        });
    }

    Err(AgentError::TurnBudgetExhausted {
        strategy: "multistep-outer",
        limit: config.max_outer_steps,
    })
}

/// Invokes `planner_tool` with the current message log (which, on a replan, already carries the
/// prior validator's reasoning as a `Reminder` — that is the "remaining goal" the new plan works
/// against) and replaces the singleton `TodoList` message with its output.
async fn plan(ctx: &mut ExecutionContext) -> Result<(), AgentError> {
    let tools = ctx.tools.specs_for(&[TOOL_PLANNER]).await;
    let calls = run_turn(ctx, &tools).await?;
    if calls.is_empty() {
        return Ok(());
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
    if let Some(envelope) = envelope {
        if let Some(markdown) = envelope.output.get("todoList").and_then(|v| v.as_str()) {
            ctx.message_log.replace_todo_list(markdown.to_string());
            ctx.narrator.thinking(markdown, Uuid::new_v4().to_string());
        }
    }
    Ok(())
}

/// Drives one LLM turn at a time against the TodoList, bounded directly by `max_inner_steps`
/// (SPEC_FULL.md §6: "while the TodoList contains any `- [ ]` and inner count < MAX_INNER_STEPS").
async fn work_through_todo_list(
    ctx: &mut ExecutionContext,
    config: &AgentConfig,
    human_input: &dyn HumanInputSource,
) -> Result<(), AgentError> {
    let tool_names = browser_tools_plus(MULTISTEP_OUTER_EXTRA);
    let tools = ctx.tools.specs_for(&tool_names).await;
    let loop_config = LoopDetectorConfig {
        lookback: config.loop_lookback,
        threshold: config.loop_threshold,
    };

    for _ in 0..config.max_inner_steps {
        if ctx.current_todo_list().is_complete() {
            return Ok(());
        }
        if ctx.is_cancelled() {
            return Err(AgentError::Cancelled);
        }

        let calls = run_turn(ctx, &tools).await?;
        if calls.is_empty() {
            return Ok(());
        }

        let signals = process_tool_calls(ctx, &calls).await?;

        if let Some(request_id) = &signals.human_input_requested {
            wait_for_human_input(
                ctx,
                human_input,
                request_id,
                config.human_input_timeout,
                config.human_input_check_interval,
            )
            .await?;
            return Ok(());
        }

        if signals.require_planning_called {
            return Ok(());
        }

        if signals.done_called || signals.result_summary.is_some() {
            let mut todos = ctx.current_todo_list();
            if todos.mark_next_done() {
                ctx.message_log.replace_todo_list(todos.to_markdown());
            }
            return Ok(());
        }

        if detect_loop(&ctx.message_log, loop_config) {
            return Err(AgentError::LoopDetected {
                strategy: "multistep-inner",
            });
        }
    }

    Err(AgentError::TurnBudgetExhausted {
        strategy: "multistep-inner",
        limit: config.max_inner_steps,
    })
}

async fn validate(ctx: &mut ExecutionContext) -> Result<(bool, String), AgentError> {
    let tools = ctx.tools.specs_for(&[TOOL_VALIDATOR]).await;
    let calls = run_turn(ctx, &tools).await?;
    if calls.is_empty() {
        return Ok((ctx.current_todo_list().is_complete(), "no validator call made".to_string()));
    }
    let signals = process_tool_calls(ctx, &calls).await?;
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
        .map(|e| crate::tools::decode_double_encoded(&e.output))
        .unwrap_or(serde_json::Value::Null);
    let is_complete = decoded.get("isComplete").and_then(|v| v.as_bool()).unwrap_or(false);
    let reasoning = decoded
        .get("reasoning")
        .and_then(|v| v.as_str())
        .unwrap_or("validated")
        .to_string();
    let _ = signals;
    Ok((is_complete || calls.iter().any(|c| c.name == TOOL_DONE), reasoning))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::browser::StubBrowserContext;
    use crate::human_input::HumanInputResolution;
    use crate::llm::mock::{MockLlm, ScriptedTurn};
    use crate::message::ToolCall;
    use crate::pubsub::Narrator;
    use crate::tools::{
        DoneTool, NavigationTool, PlannerTool, ResultTool, ToolRegistry, ToolRegistryLocked,
        ValidatorTool,
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
        registry.register(Box::new(PlannerTool));
        registry.register(Box::new(NavigationTool));
        registry.register(Box::new(DoneTool));
        registry.register(Box::new(ResultTool));
        registry.register(Box::new(ValidatorTool));
        ToolRegistryLocked::new(registry)
    }

    #[tokio::test]
    async fn completes_after_plan_work_and_validation() {
        let llm = MockLlm::scripted(vec![
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
        let mut ctx = ExecutionContext::new(
            "find item",
            "agent-1",
            Arc::new(llm),
            Arc::new(StubBrowserContext::new()),
            test_registry(),
            Narrator::default(),
        );
        ctx.message_log.init("system", "find item");
        let config = AgentConfig::default();
        let outcome = run_multistep(&mut ctx, &config, &NoHumanInput).await.unwrap();
        assert_eq!(outcome.summary, "task finished");
    }

    /// **Scenario**: a first validation reports incomplete, so the outer loop replans (invoking
    /// `planner_tool` a second time) before trying the todo list again (SPEC_FULL.md §8 scenario
    /// 3, "multi-step order with replanning").
    #[tokio::test]
    async fn failed_validation_triggers_a_replan_before_retrying() {
        let llm = MockLlm::scripted(vec![
            ScriptedTurn {
                content: "".to_string(),
                tool_calls: vec![ToolCall {
                    id: "plan-1".to_string(),
                    name: "planner_tool".to_string(),
                    args: serde_json::json!({"steps": [{"action": "add to cart", "reasoning": "first pass"}]}),
                }],
            },
            ScriptedTurn {
                content: "".to_string(),
                tool_calls: vec![ToolCall {
                    id: "work-1".to_string(),
                    name: "done_tool".to_string(),
                    args: serde_json::json!({"reason": "added to cart"}),
                }],
            },
            ScriptedTurn {
                content: "".to_string(),
                tool_calls: vec![ToolCall {
                    id: "validate-1".to_string(),
                    name: "validator_tool".to_string(),
                    args: serde_json::json!({"isComplete": false, "reasoning": "proceed to checkout"}),
                }],
            },
            ScriptedTurn {
                content: "".to_string(),
                tool_calls: vec![ToolCall {
                    id: "plan-2".to_string(),
                    name: "planner_tool".to_string(),
                    args: serde_json::json!({"steps": [{"action": "checkout", "reasoning": "proceed to checkout"}]}),
                }],
            },
            ScriptedTurn {
                content: "".to_string(),
                tool_calls: vec![ToolCall {
                    id: "work-2".to_string(),
                    name: "done_tool".to_string(),
                    args: serde_json::json!({"reason": "checked out"}),
                }],
            },
            ScriptedTurn {
                content: "".to_string(),
                tool_calls: vec![ToolCall {
                    id: "validate-2".to_string(),
                    name: "validator_tool".to_string(),
                    args: serde_json::json!({"isComplete": true, "reasoning": "order confirmed"}),
                }],
            },
        ]);
        let mut ctx = ExecutionContext::new(
            "order toothpaste on amazon",
            "agent-1",
            Arc::new(llm),
            Arc::new(StubBrowserContext::new()),
            test_registry(),
            Narrator::default(),
        );
        ctx.message_log.init("system", "order toothpaste on amazon");
        let config = AgentConfig::default();
        let outcome = run_multistep(&mut ctx, &config, &NoHumanInput).await.unwrap();
        assert_eq!(outcome.summary, "order confirmed");

        let planner_calls = ctx
            .message_log
            .messages()
            .iter()
            .filter_map(|m| match m {
                Message::Ai { tool_calls, .. } => Some(tool_calls),
                _ => None,
            })
            .flatten()
            .filter(|c| c.name == "planner_tool")
            .count();
        assert_eq!(planner_calls, 2);
    }

    /// **Scenario**: a predefined plan skips the first `planner_tool` call (SPEC_FULL.md §8
    /// scenario "MultiStep with a predefined plan ... never calls the planner on the first outer
    /// iteration"), but a failed validation still replans normally.
    #[tokio::test]
    async fn predefined_plan_skips_the_first_planner_call() {
        let llm = MockLlm::scripted(vec![ScriptedTurn {
            content: "".to_string(),
            tool_calls: vec![ToolCall {
                id: "work-1".to_string(),
                name: "done_tool".to_string(),
                args: serde_json::json!({"reason": "done"}),
            }],
        }]);
        let mut ctx = ExecutionContext::new(
            "find item",
            "agent-1",
            Arc::new(llm),
            Arc::new(StubBrowserContext::new()),
            test_registry(),
            Narrator::default(),
        );
        ctx.message_log.init("system", "find item");
        let config = AgentConfig::default();
        let outcome = run_multistep_with_initial_plan(
            &mut ctx,
            &config,
            &NoHumanInput,
            "- [ ] find item",
        )
        .await;
        // The todo item is marked done by work_through_todo_list but no validator_tool is
        // registered in this test's registry, so validate() falls back to the todo list's own
        // completeness and the run finishes on the first outer iteration without ever calling
        // planner_tool.
        assert!(outcome.is_ok());
        let planner_calls = ctx
            .message_log
            .messages()
            .iter()
            .filter_map(|m| match m {
                Message::Ai { tool_calls, .. } => Some(tool_calls),
                _ => None,
            })
            .flatten()
            .filter(|c| c.name == "planner_tool")
            .count();
        assert_eq!(planner_calls, 0);
    }
}
