//! Glow registry: idempotent per-tab start/stop of the page-highlight visual
//! (SPEC_FULL.md §4.1/§6 `GLOW_ENABLED_TOOLS`).
//!
//! A second `navigation_tool` call on a tab already glowing must not publish a second
//! `glow_start`, and stopping a tab that was never started must not publish `glow_stop` — the UI
//! side treats these as a simple on/off per tab and a spurious duplicate would desync it.

use std::collections::HashSet;
use std::sync::Mutex;

use crate::pubsub::Narrator;

#[derive(Default)]
pub struct GlowRegistry {
    active: Mutex<HashSet<String>>,
}

impl GlowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&self, narrator: &Narrator, tab_id: impl Into<String>) {
        let tab_id = tab_id.into();
        let mut active = self.active.lock().unwrap();
        if active.insert(tab_id.clone()) {
            narrator.glow_start(tab_id);
        }
    }

    pub fn stop(&self, narrator: &Narrator, tab_id: impl Into<String>) {
        let tab_id = tab_id.into();
        let mut active = self.active.lock().unwrap();
        if active.remove(&tab_id) {
            narrator.glow_stop(tab_id);
        }
    }

    pub fn is_active(&self, tab_id: &str) -> bool {
        self.active.lock().unwrap().contains(tab_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_start_on_same_tab_does_not_republish() {
        let registry = GlowRegistry::new();
        let narrator = Narrator::default();
        let mut rx = narrator.subscribe();
        registry.start(&narrator, "tab-0");
        registry.start(&narrator, "tab-0");
        let mut starts = 0;
        while let Ok(event) = rx.try_recv() {
            if matches!(event, crate::pubsub::UiEvent::GlowStart { .. }) {
                starts += 1;
            }
        }
        assert_eq!(starts, 1);
    }

    #[test]
    fn stop_on_never_started_tab_is_a_no_op() {
        let registry = GlowRegistry::new();
        let narrator = Narrator::default();
        let mut rx = narrator.subscribe();
        registry.stop(&narrator, "tab-0");
        assert!(rx.try_recv().is_err());
        assert!(!registry.is_active("tab-0"));
    }
}
