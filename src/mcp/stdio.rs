// Stdio transport - newline-delimited JSON-RPC on stdin/stdout
use super::server::McpServer;
use crate::errors::{McpError, McpResult};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info};

/// Serve MCP on the process's stdin/stdout until stdin closes.
pub async fn serve_stdio(server: &McpServer) -> McpResult<()> {
    info!("🔗 Notion MCP server starting on stdio");
    info!("🔌 {} tools registered", server.dispatcher().tool_count());

    serve(server, tokio::io::stdin(), tokio::io::stdout())
        .await
        .map_err(|e| McpError::Internal(format!("stdio transport failed: {}", e)))?;

    info!("MCP server shutting down");
    Ok(())
}

/// One response line per request line, in input order. Stdout carries nothing else.
pub async fn serve<R, W>(server: &McpServer, input: R, mut output: W) -> std::io::Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut reader = BufReader::new(input);
    let mut line = String::new();

    loop {
        line.clear();
        let n = reader.read_line(&mut line).await?;
        if n == 0 {
            break; // EOF
        }

        let message = line.trim();
        if message.is_empty() {
            continue;
        }

        let Some(response) = server.handle_message(message).await else {
            continue;
        };

        let response_str = serde_json::to_string(&response)?;
        debug!("📤 Sending response: {}", response_str);

        output.write_all(response_str.as_bytes()).await?;
        output.write_all(b"\n").await?;
        output.flush().await?;
    }

    Ok(())
}
