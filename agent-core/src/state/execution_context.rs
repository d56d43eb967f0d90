//! `ExecutionContext`: the single owner of everything a strategy needs for one run
//! (SPEC_FULL.md §3 ExecutionContext, §5 Concurrency & Resource Model).
//!
//! One context per task. Strategies and the tool-call processor borrow from it; nothing downstream
//! holds an owned copy of the log or the todo list, so there is exactly one writer at a time
//! (`&mut ExecutionContext` through the call stack), matching the single-writer rule in §5.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::browser::BrowserContext;
use crate::compress::CompactionConfig;
use crate::glow::GlowRegistry;
use crate::llm::LlmClient;
use crate::message::Usage;
use crate::pubsub::Narrator;
use crate::tools::ToolRegistryLocked;

use super::message_log::MessageLog;
use super::todo_list::TodoList;

/// Everything one agent run owns. Constructed once by the orchestrator, then threaded by
/// `&mut` reference through classification, strategy execution, and finalisation.
pub struct ExecutionContext {
    pub task: String,
    pub agent_id: String,
    pub message_log: MessageLog,
    pub total_usage: Usage,
    pub cancellation: CancellationToken,
    pub llm: Arc<dyn LlmClient>,
    pub browser: Arc<dyn BrowserContext>,
    pub tools: ToolRegistryLocked,
    pub narrator: Narrator,
    pub glow: GlowRegistry,
    /// Set by `human_input_tool` when the LLM asks to pause; cleared once the gate resolves it.
    pub pending_human_input: Option<String>,
    /// Pruning/compaction tuning for this run (SPEC_FULL.md §4.12); off by default, same as
    /// `CompactionConfig::default()`. The turn driver applies it before every LLM call.
    pub compaction: CompactionConfig,
}

impl ExecutionContext {
    pub fn new(
        task: impl Into<String>,
        agent_id: impl Into<String>,
        llm: Arc<dyn LlmClient>,
        browser: Arc<dyn BrowserContext>,
        tools: ToolRegistryLocked,
        narrator: Narrator,
    ) -> Self {
        Self {
            task: task.into(),
            agent_id: agent_id.into(),
            message_log: MessageLog::new(),
            total_usage: Usage::default(),
            cancellation: CancellationToken::new(),
            llm,
            browser,
            tools,
            narrator,
            glow: GlowRegistry::new(),
            pending_human_input: None,
            compaction: CompactionConfig::default(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    /// Folds one turn's usage into the running cumulative total (SPEC_FULL.md §3.1).
    pub fn record_usage(&mut self, usage: Usage) {
        self.total_usage = self.total_usage.accumulate(&usage);
        self.narrator.custom(serde_json::json!({
            "type": "usage",
            "promptTokens": usage.prompt_tokens,
            "completionTokens": usage.completion_tokens,
            "totalTokens": usage.total_tokens,
            "cumulativeTotalTokens": self.total_usage.total_tokens,
        }));
    }

    /// Reads back the current todo list from the singleton `TodoList` message, or an empty list
    /// if none has been set yet.
    pub fn current_todo_list(&self) -> TodoList {
        self.message_log
            .messages()
            .iter()
            .rev()
            .find(|m| m.is_todo_list())
            .map(|m| TodoList::parse(m.content()))
            .unwrap_or_default()
    }
}
