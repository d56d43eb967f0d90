//! Context compaction (SPEC_FULL.md §4.12): keeps an over-long message log inside a provider's
//! context window by first pruning old tool-result bytes, then (if still over budget)
//! LLM-summarising everything but the most recent messages.
//!
//! A character-count-over-four token estimate stands in for a real tokenizer, matching the
//! coarse heuristic the budgets above are already expressed in round numbers for.

pub mod config;

pub use config::CompactionConfig;

use crate::error::AgentError;
use crate::llm::LlmClient;
use crate::message::Message;
use crate::state::MessageLog;

fn estimate_tokens(text: &str) -> u32 {
    (text.len() as u32) / 4
}

fn log_token_estimate(log: &MessageLog) -> u32 {
    log.messages().iter().map(|m| estimate_tokens(m.content())).sum()
}

/// Replaces tool-result message bodies older than `compact_keep_recent` with a short marker,
/// once the log's estimated size exceeds `prune_keep_tokens`. Never prunes a result shorter than
/// `prune_minimum`. Returns the number of messages pruned.
pub fn prune(log: &mut MessageLog, config: &CompactionConfig) -> usize {
    if !config.prune {
        return 0;
    }
    if log_token_estimate(log) <= config.prune_keep_tokens {
        return 0;
    }

    let keep_recent = config.compact_keep_recent;
    let total = log.messages().len();
    let cutoff = total.saturating_sub(keep_recent);
    let prune_minimum = config.prune_minimum.unwrap_or(0);

    let mut pruned = 0;
    let call_ids: Vec<String> = log.messages()[..cutoff]
        .iter()
        .filter_map(|m| match m {
            Message::Tool { tool_call_id, content }
                if estimate_tokens(content) >= prune_minimum =>
            {
                Some(tool_call_id.clone())
            }
            _ => None,
        })
        .collect();

    for call_id in call_ids {
        log.summarize_tool_result(&call_id, "[pruned: result exceeded context budget]");
        pruned += 1;
    }
    pruned
}

/// Summarises every message but the most recent `compact_keep_recent` into a single system note,
/// once the log still exceeds `effective_budget()` after pruning. Best-effort: an LLM failure
/// here is non-fatal — the run continues with the uncompacted log rather than aborting the task
/// over a housekeeping failure.
pub async fn compact(
    log: &mut MessageLog,
    llm: &dyn LlmClient,
    config: &CompactionConfig,
) -> Result<bool, AgentError> {
    if !config.auto {
        return Ok(false);
    }
    if log_token_estimate(log) <= config.effective_budget() {
        return Ok(false);
    }

    let total = log.messages().len();
    let keep_recent = config.compact_keep_recent;
    if total <= keep_recent {
        return Ok(false);
    }
    let cutoff = total - keep_recent;

    let transcript: String = log.messages()[..cutoff]
        .iter()
        .map(|m| m.content())
        .collect::<Vec<_>>()
        .join("\n");
    let prompt = format!(
        "Summarise this conversation history concisely, keeping any facts needed to continue \
         the task:\n\n{transcript}"
    );
    let response = llm.invoke(&[Message::human(prompt)], &[]).await?;

    let mut rebuilt = MessageLog::new();
    rebuilt.push(Message::system(format!(
        "[compacted summary of earlier turns]\n{}",
        response.content
    )));
    for message in &log.messages()[cutoff..] {
        rebuilt.push(message.clone());
    }
    *log = rebuilt;
    Ok(true)
}
