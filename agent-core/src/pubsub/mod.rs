//! PubSub / Narrator: ordered publish of typed UI events.
//!
//! A single-producer, multi-subscriber channel (SPEC_FULL.md §9): subscribers are
//! unsubscribable (drop the `Receiver`) and cleanup-safe, and the core tolerates zero
//! subscribers — publishing is fire-and-forget. Grounded on the teacher's `stream::StreamWriter`
//! mode-gated emit pattern, narrowed from a generic `StreamEvent<S>` to this domain's fixed UI
//! event shapes and bridged to the `stream-event` wire protocol for any external subscriber.

use tokio::sync::broadcast;

use stream_event::{MessageRole, ProtocolEvent};

/// Role of a streamed or one-shot `message` event (SPEC_FULL.md §6 PubSub contract).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Thinking,
    Assistant,
    Narration,
    Error,
    System,
}

impl From<Role> for MessageRole {
    fn from(role: Role) -> Self {
        match role {
            Role::Thinking => MessageRole::Thinking,
            Role::Assistant => MessageRole::Assistant,
            Role::Narration => MessageRole::Narration,
            Role::Error => MessageRole::Error,
            Role::System => MessageRole::System,
        }
    }
}

/// A UI-facing event published by the core. Mirrors SPEC_FULL.md §6's stable contract.
#[derive(Debug, Clone)]
pub enum UiEvent {
    Message {
        role: Role,
        content: String,
        msg_id: String,
    },
    HumanInputRequest {
        request_id: String,
        prompt: String,
    },
    HumanInputResponse {
        request_id: String,
        action: String,
    },
    PlanGenerationUpdate {
        stage: &'static str,
        plan: Option<serde_json::Value>,
    },
    GlowStart {
        tab_id: String,
    },
    GlowStop {
        tab_id: String,
    },
    ToolCallChunk {
        call_id: String,
        name: Option<String>,
        arguments_delta: String,
    },
    ToolCall {
        call_id: String,
        name: String,
        arguments: serde_json::Value,
    },
    Usage {
        prompt_tokens: u32,
        completion_tokens: u32,
        total_tokens: u32,
    },
    Custom {
        value: serde_json::Value,
    },
}

impl UiEvent {
    /// Converts to the wire-level `ProtocolEvent` for transport to an external subscriber.
    pub fn to_protocol_event(&self) -> ProtocolEvent {
        match self {
            UiEvent::Message {
                role,
                content,
                msg_id,
            } => ProtocolEvent::Message {
                role: (*role).into(),
                content: content.clone(),
                msg_id: msg_id.clone(),
            },
            UiEvent::HumanInputRequest { request_id, prompt } => ProtocolEvent::HumanInputRequest {
                request_id: request_id.clone(),
                prompt: prompt.clone(),
            },
            UiEvent::HumanInputResponse { request_id, action } => {
                ProtocolEvent::HumanInputResponse {
                    request_id: request_id.clone(),
                    action: action.clone(),
                }
            }
            UiEvent::PlanGenerationUpdate { stage, plan } => ProtocolEvent::PlanGenerationUpdate {
                stage: (*stage).to_string(),
                plan: plan.clone(),
            },
            UiEvent::GlowStart { tab_id } => ProtocolEvent::GlowStart {
                tab_id: tab_id.clone(),
            },
            UiEvent::GlowStop { tab_id } => ProtocolEvent::GlowStop {
                tab_id: tab_id.clone(),
            },
            UiEvent::ToolCallChunk {
                call_id,
                name,
                arguments_delta,
            } => ProtocolEvent::ToolCallChunk {
                call_id: call_id.clone(),
                name: name.clone(),
                arguments_delta: arguments_delta.clone(),
            },
            UiEvent::ToolCall {
                call_id,
                name,
                arguments,
            } => ProtocolEvent::ToolCall {
                call_id: call_id.clone(),
                name: name.clone(),
                arguments: arguments.clone(),
            },
            UiEvent::Usage {
                prompt_tokens,
                completion_tokens,
                total_tokens,
            } => ProtocolEvent::Usage {
                prompt_tokens: *prompt_tokens,
                completion_tokens: *completion_tokens,
                total_tokens: *total_tokens,
            },
            UiEvent::Custom { value } => ProtocolEvent::Custom {
                value: value.clone(),
            },
        }
    }
}

/// Narrator: the single-producer handle strategies and tools publish events through.
///
/// Cloning shares the same underlying channel (cheap `Sender` clone). Dropping the last
/// `Narrator` and every `Receiver` drops the channel; publishing with zero live receivers is a
/// no-op (broadcast's `send` error on no-receivers is swallowed).
#[derive(Clone)]
pub struct Narrator {
    tx: broadcast::Sender<UiEvent>,
}

impl Narrator {
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<UiEvent> {
        self.tx.subscribe()
    }

    fn publish(&self, event: UiEvent) {
        let _ = self.tx.send(event);
    }

    pub fn message(&self, role: Role, content: impl Into<String>, msg_id: impl Into<String>) {
        self.publish(UiEvent::Message {
            role,
            content: content.into(),
            msg_id: msg_id.into(),
        });
    }

    pub fn thinking(&self, content: impl Into<String>, msg_id: impl Into<String>) {
        self.message(Role::Thinking, content, msg_id);
    }

    pub fn assistant(&self, content: impl Into<String>, msg_id: impl Into<String>) {
        self.message(Role::Assistant, content, msg_id);
    }

    pub fn narration(&self, content: impl Into<String>, msg_id: impl Into<String>) {
        self.message(Role::Narration, content, msg_id);
    }

    pub fn error(&self, content: impl Into<String>, msg_id: impl Into<String>) {
        self.message(Role::Error, content, msg_id);
    }

    pub fn human_input_request(&self, request_id: impl Into<String>, prompt: impl Into<String>) {
        self.publish(UiEvent::HumanInputRequest {
            request_id: request_id.into(),
            prompt: prompt.into(),
        });
    }

    pub fn human_input_response(&self, request_id: impl Into<String>, action: impl Into<String>) {
        self.publish(UiEvent::HumanInputResponse {
            request_id: request_id.into(),
            action: action.into(),
        });
    }

    pub fn plan_update(&self, stage: &'static str, plan: Option<serde_json::Value>) {
        self.publish(UiEvent::PlanGenerationUpdate { stage, plan });
    }

    pub fn glow_start(&self, tab_id: impl Into<String>) {
        self.publish(UiEvent::GlowStart {
            tab_id: tab_id.into(),
        });
    }

    pub fn glow_stop(&self, tab_id: impl Into<String>) {
        self.publish(UiEvent::GlowStop {
            tab_id: tab_id.into(),
        });
    }

    pub fn tool_call(&self, call_id: impl Into<String>, name: impl Into<String>, arguments: serde_json::Value) {
        self.publish(UiEvent::ToolCall {
            call_id: call_id.into(),
            name: name.into(),
            arguments,
        });
    }

    pub fn custom(&self, value: serde_json::Value) {
        self.publish(UiEvent::Custom { value });
    }
}

impl Default for Narrator {
    fn default() -> Self {
        Self::new(256)
    }
}
