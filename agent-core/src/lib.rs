//! # agent-core
//!
//! Orchestration engine for an autonomous browser-automation agent: classify a task, dispatch it
//! to a strategy (`SimpleTask`, `MultiStep`, or `ReAct`), drive the LLM turn-by-turn against a
//! registered tool suite, validate progress, and publish everything as a stream of typed UI
//! events (`pubsub::UiEvent`).
//!
//! The concrete browser driver, LLM provider wire format, and any UI are all out of scope; this
//! crate only defines and drives the capabilities (`BrowserContext`, `LlmClient`) those
//! collaborators implement. `agent-cli` wires a stub/mock implementation of both for a runnable
//! demonstration.
//!
//! Entry point: [`orchestrator::run_agent`].

pub mod browser;
pub mod classifier;
pub mod compress;
pub mod error;
pub mod glow;
pub mod human_input;
pub mod llm;
pub mod loop_detector;
pub mod message;
pub mod orchestrator;
pub mod pubsub;
pub mod state;
pub mod strategy;
pub mod tools;
pub mod turn;

pub use browser::{BrowserConfig, BrowserContext, PageHandle, StubBrowserContext};
pub use classifier::Classification;
pub use error::AgentError;
pub use human_input::{HumanInputResolution, HumanInputSource};
pub use llm::{LlmClient, LlmResponse};
pub use message::Message;
pub use orchestrator::{run_agent, AgentRunOutcome, ForcedMode};
pub use pubsub::{Narrator, Role, UiEvent};
pub use state::{ExecutionContext, PredefinedPlan};
pub use strategy::StrategyOutcome;
pub use tools::{Tool, ToolRegistry, ToolRegistryLocked};
