//! ToolRegistry and the Tool Contract (SPEC_FULL.md §4.1).
//!
//! A tool is `{ name, description, schema, invoke(args) }`. Tools never throw across the
//! boundary: on internal failure they catch, publish an `error` UI event themselves (SPEC_FULL.md
//! §11 decided open question — tools own user-surfacing of their own failures), and return
//! `{ ok: false, output: <human-readable> }`. `ToolSourceError` is reserved for lower-level
//! failures a `ToolSource` adapter (not a single `Tool`) can raise — e.g. an MCP transport error —
//! which the orchestrator may treat as fatal rather than as a normal `ok:false` turn outcome.

mod classification;
mod done;
mod extract;
mod human_input;
mod interaction;
mod mcp;
mod navigation;
mod planner;
mod refresh_state;
mod registry;
mod require_planning;
mod result;
mod screenshot;
mod scroll;
mod search;
mod tab_operations;
mod todo_manager;
mod validator;

pub use classification::ClassificationTool;
pub use done::DoneTool;
pub use extract::ExtractTool;
pub use human_input::HumanInputTool;
pub use interaction::InteractionTool;
pub use mcp::McpTool;
pub use navigation::NavigationTool;
pub use planner::PlannerTool;
pub use refresh_state::RefreshBrowserStateTool;
pub use registry::{ToolRegistry, ToolRegistryLocked};
pub use require_planning::RequirePlanningTool;
pub use result::ResultTool;
pub use screenshot::ScreenshotTool;
pub use scroll::ScrollTool;
pub use search::SearchTool;
pub use tab_operations::TabOperationsTool;
pub use todo_manager::TodoManagerTool;
pub use validator::ValidatorTool;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::browser::BrowserContext;
use crate::message::Message;
use crate::pubsub::Narrator;

/// Names of the tools that visibly interact with the page and trigger the glow visual
/// (SPEC_FULL.md §4.3 bullet 2 / §6 `GLOW_ENABLED_TOOLS`).
pub const GLOW_ENABLED_TOOLS: &[&str] = &[
    "navigation_tool",
    "interaction_tool",
    "scroll_tool",
    "search_tool",
    "refresh_browser_state_tool",
    "tab_operations_tool",
    "screenshot_tool",
    "extract_tool",
];

/// Stable tool-name constants, used both by the registry and by the tool-call processor's
/// name-keyed post-action dispatch (SPEC_FULL.md §4.3).
pub const TOOL_CLASSIFICATION: &str = "classification_tool";
pub const TOOL_PLANNER: &str = "planner_tool";
pub const TOOL_VALIDATOR: &str = "validator_tool";
pub const TOOL_RESULT: &str = "result_tool";
pub const TOOL_NAVIGATION: &str = "navigation_tool";
pub const TOOL_INTERACTION: &str = "interaction_tool";
pub const TOOL_SCROLL: &str = "scroll_tool";
pub const TOOL_SEARCH: &str = "search_tool";
pub const TOOL_REFRESH_BROWSER_STATE: &str = "refresh_browser_state_tool";
pub const TOOL_TAB_OPERATIONS: &str = "tab_operations_tool";
pub const TOOL_SCREENSHOT: &str = "screenshot_tool";
pub const TOOL_EXTRACT: &str = "extract_tool";
pub const TOOL_DONE: &str = "done_tool";
pub const TOOL_REQUIRE_PLANNING: &str = "require_planning_tool";
pub const TOOL_HUMAN_INPUT: &str = "human_input_tool";
pub const TOOL_TODO_MANAGER: &str = "todo_manager_tool";
pub const TOOL_MCP: &str = "mcp_tool";

/// Lower-level error a `ToolSource` adapter can raise. Distinct from a tool's own `ok:false`
/// envelope: this is for failures the orchestrator cannot hand back to the LLM as a normal turn
/// outcome (a malformed registration, a transport that never answered).
#[derive(Debug, Error)]
pub enum ToolSourceError {
    #[error("tool not found: {0}")]
    NotFound(String),
    #[error("invalid input for tool {tool}: {message}")]
    InvalidInput { tool: String, message: String },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("json-rpc error: {0}")]
    JsonRpc(String),
}

/// Structural schema + stable name + description shown to the LLM.
#[derive(Debug, Clone)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// `{ ok, output }`, the universal tool return shape (SPEC_FULL.md §3/§6).
#[derive(Debug, Clone)]
pub struct ToolResultEnvelope {
    pub ok: bool,
    pub output: Value,
}

impl ToolResultEnvelope {
    pub fn success(output: impl Into<Value>) -> Self {
        Self {
            ok: true,
            output: output.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            output: Value::String(message.into()),
        }
    }

    /// Serialises `{ok, output}` to a JSON string, the wire form recorded into the MessageLog.
    pub fn to_json_string(&self) -> String {
        serde_json::json!({ "ok": self.ok, "output": self.output }).to_string()
    }

    /// Parses a previously-serialised envelope back out of a `tool` message's content.
    pub fn from_json_str(s: &str) -> Option<Self> {
        let v: Value = serde_json::from_str(s).ok()?;
        Some(Self {
            ok: v.get("ok")?.as_bool()?,
            output: v.get("output")?.clone(),
        })
    }
}

/// "Parse if output is a string that parses as JSON" (SPEC_FULL.md §9 design note). Classifier
/// and validator both double-encode: their `output` is itself a JSON-looking string. Callers
/// that need the structured payload should call this before matching on `output`'s shape.
pub fn decode_double_encoded(output: &Value) -> Value {
    if let Value::String(s) = output {
        let trimmed = s.trim();
        let looks_like_json = trimmed.starts_with(['{', '[', '"'])
            || matches!(trimmed, "true" | "false" | "null")
            || trimmed.parse::<f64>().is_ok();
        if looks_like_json {
            if let Ok(parsed) = serde_json::from_str::<Value>(trimmed) {
                return parsed;
            }
        }
    }
    output.clone()
}

/// Everything a tool needs at call time, borrowed for the duration of the call. No tool holds
/// an owned copy of `ExecutionContext` (SPEC_FULL.md §9: no two-way pointers, context is the
/// single owner); this is the borrow tools receive instead.
pub struct ToolCallContext<'a> {
    pub browser: &'a dyn BrowserContext,
    pub narrator: &'a Narrator,
    pub recent_messages: &'a [Message],
}

impl<'a> ToolCallContext<'a> {
    pub fn new(
        browser: &'a dyn BrowserContext,
        narrator: &'a Narrator,
        recent_messages: &'a [Message],
    ) -> Self {
        Self {
            browser,
            narrator,
            recent_messages,
        }
    }
}

/// A named, schema-typed capability exposed to the LLM.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn spec(&self) -> ToolSpec;
    async fn call(
        &self,
        args: Value,
        ctx: &ToolCallContext<'_>,
    ) -> Result<ToolResultEnvelope, ToolSourceError>;
}
