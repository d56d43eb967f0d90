//! Named table of tools with input schemas, descriptions, and invokers (SPEC_FULL.md §4.1).

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;

use super::{Tool, ToolCallContext, ToolResultEnvelope, ToolSourceError, ToolSpec};

/// Ordered-by-registration table of tools, keyed by name.
pub struct ToolRegistry {
    order: Vec<String>,
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            tools: HashMap::new(),
        }
    }

    /// Registers a tool; panics on a duplicate name since tool names are part of the external
    /// LLM contract and a silent overwrite would be a programming error, not a runtime one.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.name().to_string();
        assert!(
            !self.tools.contains_key(&name),
            "tool {name} registered twice"
        );
        self.order.push(name.clone());
        self.tools.insert(name, tool);
    }

    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    /// Ordered list of tools, used both for LLM tool binding and for prompt descriptions.
    pub fn get_all(&self) -> Vec<&dyn Tool> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name).map(|t| t.as_ref()))
            .collect()
    }

    pub fn specs(&self) -> Vec<ToolSpec> {
        self.get_all().into_iter().map(|t| t.spec()).collect()
    }

    /// Specs for just the named tools, in registration order, silently skipping any name not
    /// registered. Lets a strategy bind only the subset it wants the LLM to see.
    pub fn specs_for(&self, names: &[&str]) -> Vec<ToolSpec> {
        self.get_all()
            .into_iter()
            .filter(|t| names.contains(&t.name()))
            .map(|t| t.spec())
            .collect()
    }

    /// Deterministic, newline-joined `name: description` text used in the system prompt.
    pub fn get_descriptions(&self) -> String {
        self.get_all()
            .into_iter()
            .map(|t| format!("{}: {}", t.name(), t.spec().description))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub async fn call(
        &self,
        name: &str,
        args: Value,
        ctx: &ToolCallContext<'_>,
    ) -> Result<ToolResultEnvelope, ToolSourceError> {
        let tool = self
            .get(name)
            .ok_or_else(|| ToolSourceError::NotFound(name.to_string()))?;
        tool.call(args, ctx).await
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Thread-safe handle over a `ToolRegistry`, for sharing across the strategy/turn-driver
/// boundary without cloning the whole table.
#[derive(Clone)]
pub struct ToolRegistryLocked {
    inner: Arc<RwLock<ToolRegistry>>,
}

impl ToolRegistryLocked {
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            inner: Arc::new(RwLock::new(registry)),
        }
    }

    pub async fn specs(&self) -> Vec<ToolSpec> {
        self.inner.read().await.specs()
    }

    pub async fn specs_for(&self, names: &[&str]) -> Vec<ToolSpec> {
        self.inner.read().await.specs_for(names)
    }

    pub async fn get_descriptions(&self) -> String {
        self.inner.read().await.get_descriptions()
    }

    pub async fn call(
        &self,
        name: &str,
        args: Value,
        ctx: &ToolCallContext<'_>,
    ) -> Result<ToolResultEnvelope, ToolSourceError> {
        self.inner.read().await.call(name, args, ctx).await
    }
}
