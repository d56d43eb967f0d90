//! Agent execution error types.
//!
//! One enum at the orchestrator/strategy boundary. Tools never raise these: a tool failure is
//! an `Ok(ToolResultEnvelope { ok: false, .. })` value, not an `Err`. See `tools::ToolSourceError`
//! for the lower-level error a `ToolSource` adapter can raise, which folds into `ExecutionFailed`
//! or `ToolSource` here depending on whether the orchestrator can recover.

use thiserror::Error;

use crate::tools::ToolSourceError;

/// Fatal error surfaced by a strategy or the orchestrator.
///
/// Non-fatal outcomes (tool `ok:false`, validator `isComplete:false`, a detected loop that a
/// strategy chooses to re-validate rather than abort) are not represented here — they are `Ok`
/// values carrying strategy-specific state instead.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The execution context's cancellation token was set.
    #[error("cancelled")]
    Cancelled,

    /// A strategy's step budget was exhausted without reaching completion.
    #[error("{strategy} exceeded its step budget ({limit} steps)")]
    TurnBudgetExhausted { strategy: &'static str, limit: u32 },

    /// The loop detector fired and the strategy treats that as fatal (MultiStep inner loop).
    #[error("agent is stuck, please restart your task ({strategy})")]
    LoopDetected { strategy: &'static str },

    /// The LLM client could not satisfy the turn driver's protocol requirements
    /// (no tool-binding support, or tool-call args that never parsed as JSON).
    #[error("LLM protocol violation: {0}")]
    LlmProtocolViolation(String),

    /// The human-input gate's wait exceeded its configured timeout.
    #[error("human input timed out")]
    HumanInputTimedOut,

    /// The human-input gate received an explicit abort response.
    #[error("human input aborted")]
    HumanInputAborted,

    /// A tool-source-level error (not a tool-reported `ok:false`) propagated to the orchestrator.
    #[error("tool source error: {0}")]
    ToolSource(#[from] ToolSourceError),

    /// Catch-all for wrapping lower-level failures (JSON, provider I/O) at a crate boundary.
    #[error("execution failed: {0}")]
    ExecutionFailed(String),
}

impl AgentError {
    /// True for the error kinds SPEC_FULL.md §7 says are "silent at the orchestrator boundary" /
    /// "terminal, surfaced as cancellation-like failure" — no `execution_error` metric is emitted.
    pub fn is_cancellation_like(&self) -> bool {
        matches!(
            self,
            AgentError::Cancelled | AgentError::HumanInputTimedOut | AgentError::HumanInputAborted
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancelled_display() {
        let err = AgentError::Cancelled;
        assert_eq!(err.to_string(), "cancelled");
        assert!(err.is_cancellation_like());
    }

    #[test]
    fn turn_budget_exhausted_display_includes_strategy_and_limit() {
        let err = AgentError::TurnBudgetExhausted {
            strategy: "multistep-outer",
            limit: 100,
        };
        let s = err.to_string();
        assert!(s.contains("multistep-outer"));
        assert!(s.contains("100"));
        assert!(!err.is_cancellation_like());
    }

    #[test]
    fn human_input_timed_out_is_cancellation_like() {
        assert!(AgentError::HumanInputTimedOut.is_cancellation_like());
        assert!(AgentError::HumanInputAborted.is_cancellation_like());
    }

    #[test]
    fn loop_detected_display() {
        let err = AgentError::LoopDetected {
            strategy: "multistep-inner",
        };
        assert!(err.to_string().contains("stuck"));
    }
}
