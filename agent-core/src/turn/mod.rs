//! LLM Turn Driver (SPEC_FULL.md §4.2): one call out to the LLM, producing an `Ai` message plus
//! zero or more tool calls, with streaming progress narrated as it arrives.

pub mod processor;

use std::collections::HashMap;

use tokio::sync::mpsc;
use uuid::Uuid;

use crate::error::AgentError;
use crate::llm::{LlmClient, MessageChunk, ToolCallChunk as LlmToolCallChunk};
use crate::message::{ToolCall, Usage};
use crate::pubsub::Narrator;
use crate::state::ExecutionContext;
use crate::tools::ToolSpec;

/// Runs one LLM turn: streams the response, narrates thinking/assistant chunks as they arrive,
/// assembles the final message, appends it to the log, and returns the tool calls (if any) for
/// the tool-call processor to execute.
///
/// Streaming contract (SPEC_FULL.md §9): the first non-empty text chunk fires a `thinking` event;
/// tool-call argument fragments are buffered per call id and the last write for a given id wins
/// once the name has been seen — a provider is free to resend the full prefix each fragment or
/// append deltas, and either way this collapses to the final string.
pub async fn run_turn(
    ctx: &mut ExecutionContext,
    tools: &[ToolSpec],
) -> Result<Vec<ToolCall>, AgentError> {
    if ctx.is_cancelled() {
        return Err(AgentError::Cancelled);
    }
    if !ctx.llm.supports_tool_binding() && !tools.is_empty() {
        return Err(AgentError::LlmProtocolViolation(
            "llm client does not support tool binding".to_string(),
        ));
    }

    let pruned = crate::compress::prune(&mut ctx.message_log, &ctx.compaction);
    if pruned > 0 {
        tracing::debug!(pruned, "pruned old tool results before LLM turn");
    }
    match crate::compress::compact(&mut ctx.message_log, ctx.llm.as_ref(), &ctx.compaction).await {
        Ok(true) => tracing::debug!("compacted message log before LLM turn"),
        Ok(false) => {}
        Err(err) => tracing::warn!(%err, "context compaction failed, continuing uncompacted"),
    }

    let msg_id = Uuid::new_v4().to_string();
    let (chunk_tx, mut chunk_rx) = mpsc::channel::<MessageChunk>(64);
    let (tool_chunk_tx, mut tool_chunk_rx) = mpsc::channel::<LlmToolCallChunk>(64);

    let narrator = ctx.narrator.clone();
    let cancellation = ctx.cancellation.clone();
    let narrate_msg_id = msg_id.clone();
    let narrate_task = tokio::spawn(async move {
        let mut started = false;
        let mut tool_names: HashMap<String, Option<String>> = HashMap::new();
        loop {
            tokio::select! {
                _ = cancellation.cancelled() => break,
                chunk = chunk_rx.recv() => {
                    match chunk {
                        Some(chunk) if !chunk.content.is_empty() => {
                            if !started {
                                narrator.thinking(&chunk.content, &narrate_msg_id);
                                started = true;
                            } else {
                                narrator.assistant(&chunk.content, &narrate_msg_id);
                            }
                        }
                        Some(_) => {}
                        None => break,
                    }
                }
                tool_chunk = tool_chunk_rx.recv() => {
                    match tool_chunk {
                        Some(tc) => {
                            if tc.name.is_some() {
                                tool_names.insert(tc.id.clone(), tc.name.clone());
                            }
                            let name = tool_names.get(&tc.id).cloned().flatten();
                            narrator.publish_tool_call_chunk(tc.id, name, tc.args_delta);
                        }
                        None => break,
                    }
                }
                else => break,
            }
        }
    });

    let recent = ctx.message_log.messages().to_vec();
    let response = ctx
        .llm
        .invoke_stream(&recent, tools, Some(chunk_tx), Some(tool_chunk_tx), &ctx.cancellation)
        .await?;
    let _ = narrate_task.await;

    if ctx.is_cancelled() {
        return Err(AgentError::Cancelled);
    }

    if let Some(usage) = response.usage {
        ctx.record_usage(usage);
    } else {
        ctx.record_usage(Usage::default());
    }

    ctx.message_log
        .push_ai_turn(response.content.clone(), response.tool_calls.clone());

    Ok(response.tool_calls)
}

impl Narrator {
    /// Publishes a streamed tool-call argument fragment. Kept as an inherent extension here
    /// (rather than on the public `Narrator` API surface) since only the turn driver needs the
    /// raw per-fragment event; everything else consumes the finalised `ToolCall`.
    fn publish_tool_call_chunk(&self, call_id: String, name: Option<String>, arguments_delta: String) {
        self.custom(serde_json::json!({
            "type": "tool_call_chunk",
            "callId": call_id,
            "name": name,
            "argumentsDelta": arguments_delta,
        }));
    }
}
