// Model Context Protocol layer: tool registry, dispatch, JSON-RPC handling and transports
pub mod dispatcher;
pub mod server;
pub mod sse;
pub mod stdio;
pub mod tools;
pub mod types;

pub use dispatcher::ToolDispatcher;
pub use server::McpServer;
pub use sse::serve_sse;
pub use stdio::serve_stdio;
pub use tools::{ToolId, ToolRegistry};
