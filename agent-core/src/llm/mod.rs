//! `LlmClient`: the provider capability the turn driver consumes (SPEC_FULL.md §6).
//!
//! The core depends on streaming yielding chunks with optional text content and progressive
//! tool-call fragments (name fixed early, args string grows monotonically, id stable), on tool
//! binding, and on a structured-output call used by the ReAct Think step. Provider wire formats
//! are explicitly out of scope (§1) — this trait is the whole contract.

pub mod mock;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::error::AgentError;
use crate::message::{Message, ToolCall, Usage};
use crate::tools::ToolSpec;

/// One streamed text fragment.
#[derive(Debug, Clone)]
pub struct MessageChunk {
    pub content: String,
}

/// One streamed tool-call fragment. `name` is fixed on the first fragment for a given `id`;
/// `args_delta` is appended to a growing buffer keyed by `id` until the stream completes.
#[derive(Debug, Clone)]
pub struct ToolCallChunk {
    pub id: String,
    pub name: Option<String>,
    pub args_delta: String,
}

/// A finalised LLM response: concatenated text, fully-formed tool calls, and usage if reported.
#[derive(Debug, Clone, Default)]
pub struct LlmResponse {
    pub content: String,
    pub tool_calls: Vec<ToolCall>,
    pub usage: Option<Usage>,
}

/// Provider-agnostic LLM capability.
///
/// `invoke`/`invoke_stream` take the tool list to bind for this call; a client that cannot bind
/// tools at all should return `AgentError::LlmProtocolViolation` from both when `tools` is
/// non-empty (SPEC_FULL.md §4.2 step 2: "if not, fail fatally with a recoverable error").
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn invoke(&self, messages: &[Message], tools: &[ToolSpec]) -> Result<LlmResponse, AgentError>;

    /// `cancellation` lets a provider stop pulling further chunks once the run is cancelled
    /// mid-stream (SPEC_FULL.md §8 scenario 5); a provider that cannot check it mid-pull may
    /// ignore it and rely on the turn driver's own post-stream check instead.
    async fn invoke_stream(
        &self,
        messages: &[Message],
        tools: &[ToolSpec],
        chunk_tx: Option<mpsc::Sender<MessageChunk>>,
        tool_chunk_tx: Option<mpsc::Sender<ToolCallChunk>>,
        cancellation: &CancellationToken,
    ) -> Result<LlmResponse, AgentError>;

    /// Structured-output call used by ReAct's Think step (`{ reasoning, toolName }`). Every other
    /// control-flow decision (classification, validation, planning) goes through `invoke_stream`
    /// bound to its own registered tool instead, so its result is subject to the same tool-call
    /// processing and message-log pairing as any other turn.
    async fn invoke_structured(
        &self,
        prompt: &str,
        schema: &serde_json::Value,
    ) -> Result<serde_json::Value, AgentError>;

    fn supports_tool_binding(&self) -> bool {
        true
    }
}
