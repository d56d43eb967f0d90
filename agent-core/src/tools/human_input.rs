//! `human_input_tool`: the LLM's way of asking the orchestrator to pause and wait for a human
//! (SPEC_FULL.md §4.10 Human-Input Gate). Distinct from the top-level gate in `crate::human_input`
//! that actually performs the pause/poll/timeout — this tool only raises the request and
//! publishes it; the gate consumes the request and resumes the loop.

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use super::{Tool, ToolCallContext, ToolResultEnvelope, ToolSourceError, ToolSpec, TOOL_HUMAN_INPUT};

pub struct HumanInputTool;

#[async_trait]
impl Tool for HumanInputTool {
    fn name(&self) -> &str {
        TOOL_HUMAN_INPUT
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name().to_string(),
            description: "Pauses the agent and asks a human for input, e.g. to solve a captcha \
                or log in."
                .to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {"prompt": {"type": "string"}},
                "required": ["prompt"]
            }),
        }
    }

    async fn call(
        &self,
        args: Value,
        ctx: &ToolCallContext<'_>,
    ) -> Result<ToolResultEnvelope, ToolSourceError> {
        let prompt = match args.get("prompt").and_then(Value::as_str) {
            Some(p) if !p.trim().is_empty() => p,
            _ => return Ok(ToolResultEnvelope::failure("missing required field: prompt")),
        };
        let request_id = Uuid::new_v4().to_string();
        ctx.narrator.human_input_request(&request_id, prompt);
        Ok(ToolResultEnvelope::success(serde_json::json!({
            "requiresHumanInput": true,
            "requestId": request_id,
            "prompt": prompt,
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::StubBrowserContext;
    use crate::pubsub::Narrator;

    #[tokio::test]
    async fn call_publishes_human_input_request() {
        let browser = StubBrowserContext::new();
        let narrator = Narrator::default();
        let mut rx = narrator.subscribe();
        let ctx = ToolCallContext::new(&browser, &narrator, &[]);
        let result = HumanInputTool
            .call(serde_json::json!({"prompt": "please log in"}), &ctx)
            .await
            .unwrap();
        assert_eq!(result.output["requiresHumanInput"], true);
        let event = rx.recv().await.unwrap();
        matches!(event, crate::pubsub::UiEvent::HumanInputRequest { .. });
    }
}
