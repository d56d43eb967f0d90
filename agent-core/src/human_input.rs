//! Human-Input Gate (SPEC_FULL.md §4.10): pauses a run once `human_input_tool` raises a request,
//! polling for a resolution until one arrives or the configured timeout elapses.
//!
//! Distinct from `tools::human_input`, which only raises the request and publishes it; this is
//! the consumer that actually blocks the strategy loop.

use std::time::Duration;

use tokio::time::Instant;

use crate::error::AgentError;
use crate::message::Message;
use crate::state::ExecutionContext;

/// What the human (or a calling harness, on their behalf) decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HumanInputResolution {
    Done(String),
    Abort,
}

/// Something a caller can poll for a resolution to a specific `request_id`. `agent-cli` wires a
/// simple in-memory mailbox; a real UI would wire this to whatever channel carries the human's
/// response back.
#[async_trait::async_trait]
pub trait HumanInputSource: Send + Sync {
    async fn poll(&self, request_id: &str) -> Option<HumanInputResolution>;
}

/// Waits for `source` to resolve `request_id`, polling every `check_interval` up to `timeout`.
/// Publishes the resolution (or the timeout as an implicit abort) back through the narrator so
/// the UI sees the round trip close. On `Done`, also appends an AI message to the log recording
/// that the human acted (SPEC_FULL.md §4.10), and clears `ctx.pending_human_input` either way —
/// the gate is resolved, successfully or not, once this returns.
pub async fn wait_for_human_input(
    ctx: &mut ExecutionContext,
    source: &dyn HumanInputSource,
    request_id: &str,
    timeout: Duration,
    check_interval: Duration,
) -> Result<String, AgentError> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(resolution) = source.poll(request_id).await {
            ctx.pending_human_input = None;
            return match resolution {
                HumanInputResolution::Done(content) => {
                    ctx.narrator.human_input_response(request_id, &content);
                    ctx.message_log
                        .push(Message::ai("Human has completed the requested manual action"));
                    Ok(content)
                }
                HumanInputResolution::Abort => {
                    ctx.narrator.human_input_response(request_id, "abort");
                    Err(AgentError::HumanInputAborted)
                }
            };
        }
        if Instant::now() >= deadline {
            ctx.narrator.human_input_response(request_id, "timeout");
            ctx.pending_human_input = None;
            return Err(AgentError::HumanInputTimedOut);
        }
        tokio::time::sleep(check_interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use crate::browser::StubBrowserContext;
    use crate::llm::mock::MockLlm;
    use crate::pubsub::Narrator;
    use crate::tools::{ToolRegistry, ToolRegistryLocked};

    struct ScriptedSource {
        answers: Mutex<Vec<Option<HumanInputResolution>>>,
    }

    #[async_trait::async_trait]
    impl HumanInputSource for ScriptedSource {
        async fn poll(&self, _request_id: &str) -> Option<HumanInputResolution> {
            let mut answers = self.answers.lock().unwrap();
            if answers.is_empty() {
                None
            } else {
                answers.remove(0)
            }
        }
    }

    fn test_context() -> ExecutionContext {
        let mut ctx = ExecutionContext::new(
            "buy toothpaste",
            "agent-1",
            Arc::new(MockLlm::with_no_tool_calls("")),
            Arc::new(StubBrowserContext::new()),
            ToolRegistryLocked::new(ToolRegistry::new()),
            Narrator::default(),
        );
        ctx.pending_human_input = Some("req-1".to_string());
        ctx
    }

    #[tokio::test]
    async fn resolves_once_source_answers_done() {
        let source = ScriptedSource {
            answers: Mutex::new(vec![None, Some(HumanInputResolution::Done("solved".to_string()))]),
        };
        let mut ctx = test_context();
        let result = wait_for_human_input(
            &mut ctx,
            &source,
            "req-1",
            Duration::from_secs(5),
            Duration::from_millis(1),
        )
        .await
        .unwrap();
        assert_eq!(result, "solved");
        assert!(ctx.pending_human_input.is_none());
        assert!(ctx
            .message_log
            .messages()
            .iter()
            .any(|m| m.is_ai() && m.content().contains("Human has completed")));
    }

    #[tokio::test]
    async fn abort_resolution_returns_aborted_error() {
        let source = ScriptedSource {
            answers: Mutex::new(vec![Some(HumanInputResolution::Abort)]),
        };
        let mut ctx = test_context();
        let result = wait_for_human_input(
            &mut ctx,
            &source,
            "req-1",
            Duration::from_secs(5),
            Duration::from_millis(1),
        )
        .await;
        assert!(matches!(result, Err(AgentError::HumanInputAborted)));
        assert!(ctx.pending_human_input.is_none());
    }

    #[tokio::test]
    async fn timeout_elapses_returns_timed_out_error() {
        let source = ScriptedSource {
            answers: Mutex::new(vec![]),
        };
        let mut ctx = test_context();
        let result = wait_for_human_input(
            &mut ctx,
            &source,
            "req-1",
            Duration::from_millis(5),
            Duration::from_millis(1),
        )
        .await;
        assert!(matches!(result, Err(AgentError::HumanInputTimedOut)));
        assert!(ctx.pending_human_input.is_none());
    }
}
