//! Protocol-level event types: wire shape for one UI-facing stream event.
//!
//! These are the events the agent core publishes to subscribers (extension side
//! panel, CLI, tests). Envelope (session_id, node_id, event_id) is applied
//! separately by `EnvelopeState`.

use serde::Serialize;
use serde_json::Value;

/// Role of a `Message` protocol event.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    Thinking,
    Assistant,
    Narration,
    Error,
    System,
}

/// Protocol event: wire shape for one stream event (type + payload).
/// Envelope (session_id, node_id, event_id) is applied separately.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProtocolEvent {
    NodeEnter {
        id: String,
    },
    NodeExit {
        id: String,
        result: Value,
    },
    /// A streamed or one-shot message. `msg_id` is stable across updates to the
    /// same streaming message so subscribers can apply last-write-wins.
    Message {
        role: MessageRole,
        content: String,
        msg_id: String,
    },
    /// A human-input request was raised by a tool.
    HumanInputRequest {
        request_id: String,
        prompt: String,
    },
    /// A human-input response arrived (from UI or timeout handling).
    HumanInputResponse {
        request_id: String,
        action: String,
    },
    /// Plan-generation lifecycle update.
    PlanGenerationUpdate {
        stage: String,
        plan: Option<Value>,
    },
    /// Page glow visual started on a tab.
    GlowStart {
        tab_id: String,
    },
    /// Page glow visual stopped on a tab.
    GlowStop {
        tab_id: String,
    },
    /// Streamed tool-call fragment (name fixed early, arguments growing).
    ToolCallChunk {
        call_id: String,
        name: Option<String>,
        arguments_delta: String,
    },
    /// A tool call was fully resolved for this turn.
    ToolCall {
        call_id: String,
        name: String,
        arguments: Value,
    },
    Usage {
        prompt_tokens: u32,
        completion_tokens: u32,
        total_tokens: u32,
    },
    Values {
        state: Value,
    },
    Updates {
        id: String,
        state: Value,
    },
    /// Arbitrary custom payload (escape hatch for tool-specific progress).
    Custom {
        value: Value,
    },
}

impl ProtocolEvent {
    /// Serializes this event to a JSON object (type + payload only; no envelope).
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_event_serializes_with_tag() {
        let ev = ProtocolEvent::Message {
            role: MessageRole::Thinking,
            content: "hello".to_string(),
            msg_id: "m1".to_string(),
        };
        let v = ev.to_value().unwrap();
        assert_eq!(v["type"], "message");
        assert_eq!(v["role"], "thinking");
        assert_eq!(v["content"], "hello");
    }

    #[test]
    fn human_input_request_roundtrips_fields() {
        let ev = ProtocolEvent::HumanInputRequest {
            request_id: "r1".to_string(),
            prompt: "please log in".to_string(),
        };
        let v = ev.to_value().unwrap();
        assert_eq!(v["type"], "human_input_request");
        assert_eq!(v["request_id"], "r1");
    }

    #[test]
    fn tool_call_chunk_carries_optional_name() {
        let ev = ProtocolEvent::ToolCallChunk {
            call_id: "c1".to_string(),
            name: None,
            arguments_delta: "{\"x\":".to_string(),
        };
        let v = ev.to_value().unwrap();
        assert_eq!(v["type"], "tool_call_chunk");
        assert!(v["name"].is_null());
    }
}
