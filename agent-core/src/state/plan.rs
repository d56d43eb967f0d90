//! Plan: an ordered list of high-level actions with reasoning, produced by `planner_tool`.
//!
//! Converted 1:1 to an initial `TodoList` by taking each step's `action` as the item text.

use serde::{Deserialize, Serialize};

use super::todo_list::TodoList;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanStep {
    pub action: String,
    pub reasoning: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Plan {
    pub steps: Vec<PlanStep>,
}

impl Plan {
    pub fn new(steps: Vec<PlanStep>) -> Self {
        Self { steps }
    }

    pub fn to_todo_list(&self) -> TodoList {
        TodoList::from_plan_steps(self.steps.iter().map(|s| s.action.clone()))
    }
}

/// A caller-supplied plan for `executionMode: predefined` (SPEC_FULL.md §4.8).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredefinedPlan {
    pub steps: Vec<PlanStep>,
    pub goal: String,
    pub name: Option<String>,
    pub agent_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_converts_to_todo_list_in_order() {
        let plan = Plan::new(vec![
            PlanStep {
                action: "navigate to amazon".to_string(),
                reasoning: "start at the marketplace".to_string(),
            },
            PlanStep {
                action: "search toothpaste".to_string(),
                reasoning: "find the item".to_string(),
            },
        ]);
        let todos = plan.to_todo_list();
        assert_eq!(todos.items().len(), 2);
        assert_eq!(todos.items()[0].text, "navigate to amazon");
        assert!(!todos.items()[0].done);
    }
}
