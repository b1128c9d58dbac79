// Tool Dispatcher - routes tool calls through the registry to the Notion client
use super::{
    tools::ToolRegistry,
    types::{McpTool, ToolCallResult},
};
use crate::{
    errors::{McpError, McpResult},
    notion::NotionApi,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct ToolDispatcher {
    registry: ToolRegistry,
    client: Arc<dyn NotionApi>,
}

impl ToolDispatcher {
    pub fn new(client: Arc<dyn NotionApi>) -> Self {
        Self {
            registry: ToolRegistry::new(),
            client,
        }
    }

    pub fn tool_count(&self) -> usize {
        self.registry.len()
    }

    /// All tool definitions, in registration order.
    pub fn list_tools(&self) -> Vec<McpTool> {
        self.registry.definitions()
    }

    /// Look up, validate and execute one tool call, surfacing the typed error.
    ///
    /// Exactly one upstream request is made on success of the lookup and
    /// validation steps; none otherwise.
    pub async fn dispatch(&self, name: &str, arguments: Value) -> McpResult<Value> {
        let tool = self
            .registry
            .get(name)
            .ok_or_else(|| McpError::UnknownTool(name.to_string()))?;

        let pending = tool.prepare(self.client.clone(), arguments)?;
        debug!(tool = tool.id.name(), "🔧 Executing tool");
        pending.await
    }

    /// Execute a tool call and fold the outcome into a tool result.
    ///
    /// Failures become error-flagged results so the calling model can react to them.
    pub async fn call_tool(&self, name: &str, arguments: Value) -> ToolCallResult {
        let outcome = self
            .dispatch(name, arguments)
            .await
            .and_then(|value| serde_json::to_string(&value).map_err(McpError::from));

        match outcome {
            Ok(text) => {
                debug!(tool = name, bytes = text.len(), "Tool call succeeded");
                ToolCallResult::success(text)
            }
            Err(e) => {
                warn!(tool = name, error = %e, transient = e.is_transient(), "Tool call failed");
                ToolCallResult::error(format!("Error calling {}: {}", name, e))
            }
        }
    }
}
