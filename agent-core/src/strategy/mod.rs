//! The three task strategies (SPEC_FULL.md §4.5–§4.7): `SimpleTask` for single-step work,
//! `MultiStep` for planned multi-step work, and `ReAct` as the alternate complex-task loop
//! selected by `StrategyMode` (SPEC_FULL.md §11 decided open question).

pub mod multistep;
pub mod react;
pub mod simple;

pub use multistep::{run_multistep, run_multistep_with_initial_plan};
pub use react::run_react;
pub use simple::{run_simple_task, SimpleTaskOutcome};

use crate::tools::{
    TOOL_DONE, TOOL_EXTRACT, TOOL_HUMAN_INPUT, TOOL_INTERACTION, TOOL_NAVIGATION,
    TOOL_REFRESH_BROWSER_STATE, TOOL_REQUIRE_PLANNING, TOOL_RESULT, TOOL_SCREENSHOT, TOOL_SCROLL,
    TOOL_SEARCH, TOOL_TAB_OPERATIONS, TOOL_TODO_MANAGER,
};

/// Tools every strategy's inner execution loop binds: everything that actually touches the page,
/// plus the two always-available control-flow tools, `done_tool` and `human_input_tool`.
pub const BROWSER_TOOLS: &[&str] = &[
    TOOL_NAVIGATION,
    TOOL_INTERACTION,
    TOOL_SCROLL,
    TOOL_SEARCH,
    TOOL_REFRESH_BROWSER_STATE,
    TOOL_TAB_OPERATIONS,
    TOOL_SCREENSHOT,
    TOOL_EXTRACT,
    TOOL_TODO_MANAGER,
    TOOL_HUMAN_INPUT,
    TOOL_DONE,
];

/// What a strategy returns once it stops running, successfully or not.
#[derive(Debug, Clone)]
pub struct StrategyOutcome {
    pub summary: String,
}

impl StrategyOutcome {
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
        }
    }
}

pub(crate) fn browser_tools_plus(extra: &[&'static str]) -> Vec<&'static str> {
    let mut tools: Vec<&'static str> = BROWSER_TOOLS.to_vec();
    tools.extend_from_slice(extra);
    tools
}

pub(crate) const SIMPLE_TASK_EXTRA: &[&str] = &[TOOL_REQUIRE_PLANNING, TOOL_RESULT];
pub(crate) const MULTISTEP_OUTER_EXTRA: &[&str] = &[TOOL_RESULT];
