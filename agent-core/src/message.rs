//! Conversation history entries: `Message` and its associated `ToolCall`/`Usage` types.
//!
//! The seven roles and the tool-call/tool-message pairing invariant are the external contract
//! most providers enforce: an `ai` message with tool calls must be followed, before the next
//! `ai`/`human` message, by one `tool` message per call id. `MessageLog` (see `state::message_log`)
//! is what actually upholds that invariant; this module only defines the shapes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single LLM-emitted tool call: stable id, tool name, and args matching the tool's schema.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub args: Value,
}

/// Token accounting for one LLM call.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl Usage {
    /// Folds another turn's usage into a running cumulative total.
    pub fn accumulate(&self, other: &Usage) -> Usage {
        Usage {
            prompt_tokens: self.prompt_tokens + other.prompt_tokens,
            completion_tokens: self.completion_tokens + other.completion_tokens,
            total_tokens: self.total_tokens + other.total_tokens,
        }
    }
}

/// One entry in the conversation history.
///
/// `Tool { tool_call_id, .. }` must reference a `ToolCall::id` present on an earlier
/// `Ai { tool_calls, .. }` message. `TodoList` and `BrowserState` are singleton-replaced roles:
/// the log special-cases their insertion rather than treating them as ordinary appends.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Message {
    System { content: String },
    Human { content: String },
    Ai {
        content: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tool_calls: Vec<ToolCall>,
    },
    Tool {
        tool_call_id: String,
        content: String,
    },
    BrowserState { content: String },
    TodoList { content: String },
    Reminder { content: String },
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Message::System {
            content: content.into(),
        }
    }

    pub fn human(content: impl Into<String>) -> Self {
        Message::Human {
            content: content.into(),
        }
    }

    pub fn ai(content: impl Into<String>) -> Self {
        Message::Ai {
            content: content.into(),
            tool_calls: Vec::new(),
        }
    }

    pub fn ai_with_tool_calls(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Message::Ai {
            content: content.into(),
            tool_calls,
        }
    }

    pub fn tool(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Message::Tool {
            tool_call_id: tool_call_id.into(),
            content: content.into(),
        }
    }

    pub fn todo_list(content: impl Into<String>) -> Self {
        Message::TodoList {
            content: content.into(),
        }
    }

    /// Returns the tool calls attached to this message, empty for every non-`Ai` variant.
    pub fn tool_calls(&self) -> &[ToolCall] {
        match self {
            Message::Ai { tool_calls, .. } => tool_calls,
            _ => &[],
        }
    }

    pub fn is_system(&self) -> bool {
        matches!(self, Message::System { .. })
    }

    pub fn is_ai(&self) -> bool {
        matches!(self, Message::Ai { .. })
    }

    pub fn is_todo_list(&self) -> bool {
        matches!(self, Message::TodoList { .. })
    }

    pub fn is_browser_state(&self) -> bool {
        matches!(self, Message::BrowserState { .. })
    }

    pub fn browser_state(content: impl Into<String>) -> Self {
        Message::BrowserState {
            content: content.into(),
        }
    }

    /// Text content for roles that carry plain text (empty string for `Tool`'s envelope body
    /// is still returned verbatim — it is JSON text, just stored as a string).
    pub fn content(&self) -> &str {
        match self {
            Message::System { content }
            | Message::Human { content }
            | Message::Ai { content, .. }
            | Message::Tool { content, .. }
            | Message::BrowserState { content }
            | Message::TodoList { content }
            | Message::Reminder { content } => content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ai_message_round_trips_tool_calls() {
        let msg = Message::ai_with_tool_calls(
            "",
            vec![ToolCall {
                id: "call-1".to_string(),
                name: "navigation_tool".to_string(),
                args: serde_json::json!({"action": "back"}),
            }],
        );
        let json = serde_json::to_string(&msg).unwrap();
        let back: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(back, msg);
        assert_eq!(back.tool_calls().len(), 1);
    }

    #[test]
    fn tool_message_carries_call_id() {
        let msg = Message::tool("call-1", r#"{"ok":true,"output":"done"}"#);
        match &msg {
            Message::Tool { tool_call_id, .. } => assert_eq!(tool_call_id, "call-1"),
            _ => panic!("expected Tool variant"),
        }
    }

    #[test]
    fn usage_accumulates() {
        let a = Usage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        };
        let b = Usage {
            prompt_tokens: 3,
            completion_tokens: 2,
            total_tokens: 5,
        };
        let total = a.accumulate(&b);
        assert_eq!(total.total_tokens, 20);
    }

    #[test]
    fn is_ai_and_is_todo_list_discriminate_variants() {
        assert!(Message::ai("hi").is_ai());
        assert!(!Message::human("hi").is_ai());
        assert!(Message::todo_list("- [ ] a").is_todo_list());
    }
}
