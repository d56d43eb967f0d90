//! Ordered, typed conversation history with pruning and reminder insertion.
//!
//! Append-only except for three special operations: `remove_all_system`, `replace_todo_list`
//! (singleton), and `clear`. The tool-call/tool-message pairing invariant (SPEC_FULL.md §3) is
//! upheld by construction: `push_ai_turn` appends the assistant message then its tool results in
//! one call, so no intermediate state with an unanswered tool call is ever observable by a reader.

use crate::message::{Message, ToolCall};

/// One tool call's result, as recorded into the log by the tool-call processor.
#[derive(Debug, Clone)]
pub struct ToolCallResult {
    pub call_id: String,
    pub envelope_json: String,
}

/// Append-only, typed conversation history.
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    messages: Vec<Message>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initialises (or re-initialises) the log with a system prompt followed by the task.
    pub fn init(&mut self, system_prompt: impl Into<String>, task: impl Into<String>) {
        self.messages.clear();
        self.messages.push(Message::system(system_prompt));
        self.messages.push(Message::human(task));
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Appends an assistant message (preserved verbatim, including its tool-call list) followed
    /// by one `tool` message per call, in order. This is the only way tool calls should enter the
    /// log, so the pairing invariant can never be observed broken mid-append.
    pub fn push_ai_turn(&mut self, content: impl Into<String>, tool_calls: Vec<ToolCall>) {
        self.messages
            .push(Message::ai_with_tool_calls(content, tool_calls));
    }

    pub fn push_tool_result(&mut self, call_id: impl Into<String>, content: impl Into<String>) {
        self.messages.push(Message::tool(call_id, content));
    }

    /// Removes every `System` message from the log, in place.
    pub fn remove_all_system(&mut self) {
        self.messages.retain(|m| !m.is_system());
    }

    /// Replaces the singleton `TodoList` message with new markdown, or appends one if absent.
    /// Returns the previous markdown, if any.
    pub fn replace_todo_list(&mut self, markdown: impl Into<String>) -> Option<String> {
        let markdown = markdown.into();
        if let Some(pos) = self.messages.iter().position(|m| m.is_todo_list()) {
            let prev = self.messages[pos].content().to_string();
            self.messages[pos] = Message::todo_list(markdown);
            Some(prev)
        } else {
            self.messages.push(Message::todo_list(markdown));
            None
        }
    }

    /// Replaces the most recent tool-result message for `call_id` with a short summary, used by
    /// `refresh_browser_state_tool` post-processing to keep the visible history compact.
    pub fn summarize_tool_result(&mut self, call_id: &str, summary: impl Into<String>) {
        if let Some(pos) = self.messages.iter().rposition(
            |m| matches!(m, Message::Tool { tool_call_id, .. } if tool_call_id == call_id),
        ) {
            self.messages[pos] = Message::tool(call_id.to_string(), summary);
        }
    }

    /// Replaces the singleton `BrowserState` message with a fresh snapshot, or appends one if
    /// absent (SPEC_FULL.md §4.3: the full browser state is routed here rather than kept inline
    /// in the `tool` message history).
    pub fn replace_browser_state(&mut self, content: impl Into<String>) {
        let content = content.into();
        if let Some(pos) = self.messages.iter().position(|m| m.is_browser_state()) {
            self.messages[pos] = Message::browser_state(content);
        } else {
            self.messages.push(Message::browser_state(content));
        }
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Truncates the log back to its first `len` messages, discarding everything appended after
    /// that point. Used by the classifier to drive its `classification_tool` turn through the
    /// same turn/processor pipeline as every other tool without leaving a trace in the visible
    /// conversation history.
    pub fn truncate(&mut self, len: usize) {
        self.messages.truncate(len);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The last `n` AI message bodies, in order, for the loop detector.
    pub fn last_ai_contents(&self, n: usize) -> Vec<String> {
        self.messages
            .iter()
            .rev()
            .filter_map(|m| match m {
                Message::Ai { content, .. } => Some(content.clone()),
                _ => None,
            })
            .take(n)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect()
    }
}
