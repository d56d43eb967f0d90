//! `BrowserContext`: the capability the core drives the browser through.
//!
//! Deliberately out of scope per SPEC_FULL.md §1: the concrete driver (tab enumeration, DOM
//! queries, screenshotting, event synthesis) lives outside this crate. This module defines only
//! the capability surface the tool suite needs, plus an in-memory stub used by tests and the
//! `agent-cli` harness when no real driver is wired up.

use async_trait::async_trait;

/// One browser tab as the core sees it.
#[derive(Debug, Clone)]
pub struct PageHandle {
    pub tab_id: String,
    pub url: String,
    pub title: String,
}

/// Feature toggles the browser side reports back (e.g. whether vision/screenshot input is on).
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserConfig {
    pub use_vision: bool,
}

/// Capability the tool suite mediates all page mutations through. The core never mutates a
/// page directly — only tools call through this trait, and only the BrowserContext's concrete
/// implementation knows how to actually drive a browser.
#[async_trait]
pub trait BrowserContext: Send + Sync {
    async fn get_current_page(&self) -> Result<PageHandle, String>;
    async fn list_tabs(&self) -> Result<Vec<PageHandle>, String>;
    async fn get_browser_state_string(&self) -> Result<String, String>;
    async fn take_screenshot(&self, tab_id: &str) -> Result<Vec<u8>, String>;
    async fn navigate(&self, tab_id: &str, url: &str) -> Result<(), String>;
    async fn create_tab(&self, url: &str) -> Result<PageHandle, String>;
    async fn close_tab(&self, tab_id: &str) -> Result<(), String>;
    fn get_config(&self) -> BrowserConfig;
}

/// In-memory stub: a single tab, a scripted browser-state string, no real navigation.
///
/// Used by `agent-cli` when no live browser driver is configured, and by `agent-core`'s own
/// strategy/orchestrator tests.
pub struct StubBrowserContext {
    state: std::sync::Mutex<StubState>,
    config: BrowserConfig,
}

struct StubState {
    tabs: Vec<PageHandle>,
    browser_state_string: String,
}

impl StubBrowserContext {
    pub fn new() -> Self {
        Self {
            state: std::sync::Mutex::new(StubState {
                tabs: vec![PageHandle {
                    tab_id: "tab-0".to_string(),
                    url: "about:blank".to_string(),
                    title: "New Tab".to_string(),
                }],
                browser_state_string: "empty page".to_string(),
            }),
            config: BrowserConfig::default(),
        }
    }

    pub fn with_browser_state(self, state: impl Into<String>) -> Self {
        self.state.lock().unwrap().browser_state_string = state.into();
        self
    }
}

impl Default for StubBrowserContext {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BrowserContext for StubBrowserContext {
    async fn get_current_page(&self) -> Result<PageHandle, String> {
        let state = self.state.lock().unwrap();
        state.tabs.last().cloned().ok_or_else(|| "no tabs open".to_string())
    }

    async fn list_tabs(&self) -> Result<Vec<PageHandle>, String> {
        Ok(self.state.lock().unwrap().tabs.clone())
    }

    async fn get_browser_state_string(&self) -> Result<String, String> {
        Ok(self.state.lock().unwrap().browser_state_string.clone())
    }

    async fn take_screenshot(&self, _tab_id: &str) -> Result<Vec<u8>, String> {
        Ok(Vec::new())
    }

    async fn navigate(&self, tab_id: &str, url: &str) -> Result<(), String> {
        let mut state = self.state.lock().unwrap();
        let tab = state
            .tabs
            .iter_mut()
            .find(|t| t.tab_id == tab_id)
            .ok_or_else(|| format!("no such tab: {tab_id}"))?;
        tab.url = url.to_string();
        Ok(())
    }

    async fn create_tab(&self, url: &str) -> Result<PageHandle, String> {
        let mut state = self.state.lock().unwrap();
        let tab = PageHandle {
            tab_id: format!("tab-{}", state.tabs.len()),
            url: url.to_string(),
            title: String::new(),
        };
        state.tabs.push(tab.clone());
        Ok(tab)
    }

    async fn close_tab(&self, tab_id: &str) -> Result<(), String> {
        let mut state = self.state.lock().unwrap();
        let before = state.tabs.len();
        state.tabs.retain(|t| t.tab_id != tab_id);
        if state.tabs.len() == before {
            return Err(format!("no such tab: {tab_id}"));
        }
        Ok(())
    }

    fn get_config(&self) -> BrowserConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_and_close_tab_round_trip() {
        let ctx = StubBrowserContext::new();
        let created = ctx.create_tab("https://example.com").await.unwrap();
        assert!(ctx
            .list_tabs()
            .await
            .unwrap()
            .iter()
            .any(|t| t.tab_id == created.tab_id));
        ctx.close_tab(&created.tab_id).await.unwrap();
        assert!(!ctx
            .list_tabs()
            .await
            .unwrap()
            .iter()
            .any(|t| t.tab_id == created.tab_id));
    }

    #[tokio::test]
    async fn navigate_updates_current_page_url() {
        let ctx = StubBrowserContext::new();
        let page = ctx.get_current_page().await.unwrap();
        ctx.navigate(&page.tab_id, "https://amazon.com").await.unwrap();
        let updated = ctx.get_current_page().await.unwrap();
        assert_eq!(updated.url, "https://amazon.com");
    }
}
