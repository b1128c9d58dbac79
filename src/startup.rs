// Startup - configuration, client and server wiring shared by the binary and tests
use crate::{
    config::{CliOverrides, McpConfig, Transport},
    errors::McpResult,
    mcp::{self, McpServer, ToolDispatcher},
    notion::NotionClient,
};
use std::sync::Arc;
use tracing::{debug, info};

pub struct Startup {
    pub config: McpConfig,
    pub server: Arc<McpServer>,
}

impl Startup {
    pub fn from_env(overrides: &CliOverrides) -> McpResult<Self> {
        Self::build(|key| std::env::var(key).ok(), overrides)
    }

    /// Load configuration and construct the Notion client and MCP server.
    ///
    /// Fails before any transport is opened when the configuration is unusable.
    pub fn build<F>(lookup: F, overrides: &CliOverrides) -> McpResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = McpConfig::from_lookup(lookup, overrides)?;
        let client = NotionClient::new(&config.notion)?;
        let server = Arc::new(McpServer::new(ToolDispatcher::new(Arc::new(client))));

        Ok(Self { config, server })
    }

    pub async fn run(self) -> McpResult<()> {
        info!(
            transport = %self.config.server.transport,
            api_version = %self.config.notion.api_version,
            base_url = %self.config.notion.base_url,
            "Loaded configuration"
        );
        for tool in self.server.dispatcher().list_tools() {
            debug!("  - {}: {}", tool.name, tool.description);
        }

        match self.config.server.transport {
            Transport::Stdio => mcp::serve_stdio(&self.server).await,
            Transport::Sse => {
                mcp::serve_sse(self.server, &self.config.server.host, self.config.server.port).await
            }
        }
    }
}
