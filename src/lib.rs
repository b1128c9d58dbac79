// Notion MCP - exposes a Notion workspace to AI agents as Model Context Protocol tools
// Served over stdio or SSE; every tool call maps onto one Notion REST request

pub mod cli;
pub mod config;
pub mod errors;
pub mod mcp;
pub mod notion;
pub mod startup;

pub use config::{McpConfig, Transport};
pub use errors::{McpError, McpResult};
pub use mcp::{McpServer, ToolDispatcher};
pub use notion::{NotionApi, NotionClient};
