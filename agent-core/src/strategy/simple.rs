//! `SimpleTask` strategy (SPEC_FULL.md §4.5): a flat turn loop for tasks the classifier judged
//! simple, with a single escape hatch — `require_planning_tool` — back up to `MultiStep` if the
//! LLM discovers mid-flight that the task actually needs a plan.

use agent_config::AgentConfig;

use crate::error::AgentError;
use crate::human_input::{wait_for_human_input, HumanInputSource};
use crate::loop_detector::{detect_loop, LoopDetectorConfig};
use crate::state::ExecutionContext;
use crate::turn::{processor::process_tool_calls, run_turn};

use super::{browser_tools_plus, StrategyOutcome, SIMPLE_TASK_EXTRA};

/// Either the task finished within the simple-task loop, or it escalated and the caller should
/// fall through to `MultiStep`/`ReAct` instead.
#[derive(Debug, Clone)]
pub enum SimpleTaskOutcome {
    Completed(StrategyOutcome),
    NeedsPlanning,
}

pub async fn run_simple_task(
    ctx: &mut ExecutionContext,
    config: &AgentConfig,
    human_input: &dyn HumanInputSource,
) -> Result<SimpleTaskOutcome, AgentError> {
    let tool_names = browser_tools_plus(SIMPLE_TASK_EXTRA);
    let tools = ctx.tools.specs_for(&tool_names).await;

    for _ in 0..config.max_simple_steps {
        if ctx.is_cancelled() {
            return Err(AgentError::Cancelled);
        }

        let calls = run_turn(ctx, &tools).await?;
        if calls.is_empty() {
            return Ok(SimpleTaskOutcome::Completed(StrategyOutcome::new(
                ctx.message_log
                    .last_ai_contents(1)
                    .into_iter()
                    .next()
                    .unwrap_or_default(),
            )));
        }

        let signals = process_tool_calls(ctx, &calls).await?;

        if signals.require_planning_called {
            return Ok(SimpleTaskOutcome::NeedsPlanning);
        }

        if let Some(request_id) = signals.human_input_requested {
            wait_for_human_input(
                ctx,
                human_input,
                &request_id,
                config.human_input_timeout,
                config.human_input_check_interval,
            )
            .await?;
        }

        if signals.done_called {
            return Ok(SimpleTaskOutcome::Completed(StrategyOutcome::new(
                signals.result_summary.unwrap_or_else(|| "task complete".to_string()),
            )));
        }
        if let Some(summary) = signals.result_summary {
            return Ok(SimpleTaskOutcome::Completed(StrategyOutcome::new(summary)));
        }

        let loop_config = LoopDetectorConfig {
            lookback: config.loop_lookback,
            threshold: config.loop_threshold,
        };
        if detect_loop(&ctx.message_log, loop_config) {
            return Err(AgentError::LoopDetected {
                strategy: "simple-task",
            });
        }
    }

    Err(AgentError::TurnBudgetExhausted {
        strategy: "simple-task",
        limit: config.max_simple_steps,
    })
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
    use crate::tools::{DoneTool, NavigationTool, RequirePlanningTool, ResultTool, ToolRegistry, ToolRegistryLocked};

    struct NoHumanInput;
    #[async_trait::async_trait]
    impl HumanInputSource for NoHumanInput {
        async fn poll(&self, _request_id: &str) -> Option<HumanInputResolution> {
            Some(HumanInputResolution::Done("n/a".to_string()))
        }
    }

    fn test_registry() -> ToolRegistryLocked {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(NavigationTool));
        registry.register(Box::new(DoneTool));
        registry.register(Box::new(RequirePlanningTool));
        registry.register(Box::new(ResultTool));
        ToolRegistryLocked::new(registry)
    }

    #[tokio::test]
    async fn completes_immediately_when_first_turn_has_no_tool_calls() {
        let llm = MockLlm::with_no_tool_calls("nothing to do here");
        let mut ctx = ExecutionContext::new(
            "say hi",
            "agent-1",
            Arc::new(llm),
            Arc::new(StubBrowserContext::new()),
            test_registry(),
            Narrator::default(),
        );
        ctx.message_log.init("system", "say hi");
        let config = AgentConfig::default();
        let outcome = run_simple_task(&mut ctx, &config, &NoHumanInput).await.unwrap();
        assert!(matches!(outcome, SimpleTaskOutcome::Completed(_)));
    }

    #[tokio::test]
    async fn require_planning_call_escalates() {
        let llm = MockLlm::scripted(vec![ScriptedTurn {
            content: "".to_string(),
            tool_calls: vec![ToolCall {
                id: "c1".to_string(),
                name: "require_planning_tool".to_string(),
                args: serde_json::json!({"reason": "turns out this needs five steps"}),
            }],
        }]);
        let mut ctx = ExecutionContext::new(
            "buy five items",
            "agent-1",
            Arc::new(llm),
            Arc::new(StubBrowserContext::new()),
            test_registry(),
            Narrator::default(),
        );
        ctx.message_log.init("system", "buy five items");
        let config = AgentConfig::default();
        let outcome = run_simple_task(&mut ctx, &config, &NoHumanInput).await.unwrap();
        assert!(matches!(outcome, SimpleTaskOutcome::NeedsPlanning));
    }

    #[tokio::test]
    async fn done_tool_call_completes_the_loop() {
        let llm = MockLlm::scripted(vec![ScriptedTurn {
            content: "".to_string(),
            tool_calls: vec![ToolCall {
                id: "c1".to_string(),
                name: "done_tool".to_string(),
                args: serde_json::json!({"reason": "all set"}),
            }],
        }]);
        let mut ctx = ExecutionContext::new(
            "say hi",
            "agent-1",
            Arc::new(llm),
            Arc::new(StubBrowserContext::new()),
            test_registry(),
            Narrator::default(),
        );
        ctx.message_log.init("system", "say hi");
        let config = AgentConfig::default();
        let outcome = run_simple_task(&mut ctx, &config, &NoHumanInput).await.unwrap();
        match outcome {
            SimpleTaskOutcome::Completed(result) => assert_eq!(result.summary, "all set"),
            other => panic!("expected Completed, got {other:?}"),
        }
    }
}
