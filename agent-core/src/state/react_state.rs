//! `ReactState`: `{ ultimateGoal, currentFocus, cycles }`, a bounded ring buffer of the last K
//! Observe/Think/Act cycles fed back into the Think prompt.

use std::collections::VecDeque;

/// One Observe → Think → Act cycle's record.
#[derive(Debug, Clone)]
pub struct Cycle {
    pub observation: String,
    pub thought: String,
    pub action: String,
}

/// Rolling state for the ReAct strategy (SPEC_FULL.md §4.7).
#[derive(Debug, Clone)]
pub struct ReactState {
    pub ultimate_goal: String,
    pub current_focus: String,
    cycles: VecDeque<Cycle>,
    capacity: usize,
}

impl ReactState {
    pub fn new(ultimate_goal: impl Into<String>, capacity: usize) -> Self {
        let ultimate_goal = ultimate_goal.into();
        Self {
            current_focus: ultimate_goal.clone(),
            ultimate_goal,
            cycles: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends a cycle, evicting the oldest once over capacity (ring buffer).
    pub fn record(&mut self, cycle: Cycle) {
        if self.cycles.len() >= self.capacity {
            self.cycles.pop_front();
        }
        self.cycles.push_back(cycle);
    }

    pub fn cycles(&self) -> impl Iterator<Item = &Cycle> {
        self.cycles.iter()
    }

    pub fn refine_focus(&mut self, new_focus: impl Into<String>) {
        self.current_focus = new_focus.into();
    }
}
