//! Mock LLM for tests and the `agent-cli` harness when no live provider key is configured.
//!
//! Returns a fixed (or scripted, call-by-call) assistant message and optional tool calls.
//! Configurable streaming: by default sends content as a single chunk; `with_stream_by_char`
//! splits it so turn-driver tests can assert on the "first non-empty chunk" and
//! "last-write-wins" behaviors in SPEC_FULL.md §4.2.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::error::AgentError;
use crate::message::{Message, ToolCall};
use crate::tools::ToolSpec;

use super::{LlmClient, LlmResponse, MessageChunk, ToolCallChunk};

/// One scripted turn: content plus tool calls to return.
#[derive(Clone, Default)]
pub struct ScriptedTurn {
    pub content: String,
    pub tool_calls: Vec<ToolCall>,
}

/// Mock LLM: a script of responses played back one per call; the last entry repeats once
/// exhausted. A single fixed `structured_response` answers every `invoke_structured` call
/// unless overridden per-call via `with_structured_responses`.
pub struct MockLlm {
    script: Vec<ScriptedTurn>,
    call_count: AtomicUsize,
    stream_by_char: bool,
    structured_responses: Mutex<Vec<serde_json::Value>>,
    structured_call_count: AtomicUsize,
}

impl MockLlm {
    /// A mock that always returns the same text and no tool calls (drives a turn straight to
    /// completion with no further tool activity).
    pub fn with_no_tool_calls(content: impl Into<String>) -> Self {
        Self::scripted(vec![ScriptedTurn {
            content: content.into(),
            tool_calls: vec![],
        }])
    }

    /// A mock that plays back one `ScriptedTurn` per call, repeating the last once the script
    /// is exhausted. Used to drive multi-turn strategy tests deterministically.
    pub fn scripted(script: Vec<ScriptedTurn>) -> Self {
        Self {
            script,
            call_count: AtomicUsize::new(0),
            stream_by_char: false,
            structured_responses: Mutex::new(Vec::new()),
            structured_call_count: AtomicUsize::new(0),
        }
    }

    pub fn with_stream_by_char(mut self) -> Self {
        self.stream_by_char = true;
        self
    }

    /// Scripts a sequence of `invoke_structured` responses, repeating the last once exhausted.
    pub fn with_structured_responses(self, responses: Vec<serde_json::Value>) -> Self {
        *self.structured_responses.lock().unwrap() = responses;
        self
    }

    fn next_turn(&self) -> ScriptedTurn {
        let n = self.call_count.fetch_add(1, Ordering::SeqCst);
        let idx = n.min(self.script.len().saturating_sub(1));
        self.script
            .get(idx)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn invoke(&self, _messages: &[Message], _tools: &[ToolSpec]) -> Result<LlmResponse, AgentError> {
        let turn = self.next_turn();
        Ok(LlmResponse {
            content: turn.content,
            tool_calls: turn.tool_calls,
            usage: None,
        })
    }

    async fn invoke_stream(
        &self,
        messages: &[Message],
        tools: &[ToolSpec],
        chunk_tx: Option<mpsc::Sender<MessageChunk>>,
        _tool_chunk_tx: Option<mpsc::Sender<ToolCallChunk>>,
        cancellation: &CancellationToken,
    ) -> Result<LlmResponse, AgentError> {
        let response = self.invoke(messages, tools).await?;
        if let Some(tx) = chunk_tx {
            if !response.content.is_empty() {
                if self.stream_by_char {
                    for c in response.content.chars() {
                        if cancellation.is_cancelled() {
                            break;
                        }
                        let _ = tx.send(MessageChunk { content: c.to_string() }).await;
                        tokio::task::yield_now().await;
                    }
                } else if !cancellation.is_cancelled() {
                    let _ = tx
                        .send(MessageChunk {
                            content: response.content.clone(),
                        })
                        .await;
                }
            }
        }
        Ok(response)
    }

    async fn invoke_structured(
        &self,
        _prompt: &str,
        _schema: &serde_json::Value,
    ) -> Result<serde_json::Value, AgentError> {
        let responses = self.structured_responses.lock().unwrap();
        if responses.is_empty() {
            return Ok(serde_json::json!({}));
        }
        let n = self.structured_call_count.fetch_add(1, Ordering::SeqCst);
        let idx = n.min(responses.len() - 1);
        Ok(responses[idx].clone())
    }
}
