// Command-line parsing for the notion-mcp binary
use crate::config::{CliOverrides, Transport};
use crate::errors::{McpError, McpResult};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Serve(CliOverrides),
    Help,
    Version,
}

pub fn usage() -> String {
    format!(
        r#"notion-mcp v{VERSION} - Notion workspace tools over the Model Context Protocol

USAGE:
    notion-mcp [OPTIONS]

OPTIONS:
    --transport <stdio|sse>   Transport to serve on (default: stdio)
    --host <HOST>             Bind address for sse (default: 0.0.0.0)
    --port <PORT>             Bind port for sse (default: 8000)
    --debug                   Enable debug logging
    -h, --help                Print this help message
    -v, --version             Print version

ENVIRONMENT:
    NOTION_API_KEY            Notion integration token (required)
    NOTION_API_VERSION        Notion-Version header (default: 2022-06-28)
    NOTION_BASE_URL           Notion API base URL (default: https://api.notion.com)
    NOTION_TIMEOUT_SECS       Request timeout in seconds (default: 30)
    MCP_TRANSPORT, MCP_HOST, MCP_PORT, MCP_DEBUG
    RUST_LOG                  Log filter (default: info)
    LOG_FORMAT                Set to 'json' for JSON logs
"#
    )
}

/// Parse arguments, excluding the program name.
pub fn parse_args<I, S>(args: I) -> McpResult<Command>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut overrides = CliOverrides::default();
    let mut args = args.into_iter().map(Into::into);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "-v" | "--version" => return Ok(Command::Version),
            "--debug" => overrides.debug = true,
            "--transport" => {
                overrides.transport = Some(value_for(&arg, args.next())?.parse::<Transport>()?);
            }
            "--host" => overrides.host = Some(value_for(&arg, args.next())?),
            "--port" => {
                let raw = value_for(&arg, args.next())?;
                let port = raw
                    .parse::<u16>()
                    .map_err(|_| McpError::Config(format!("invalid port '{}'", raw)))?;
                overrides.port = Some(port);
            }
            other => return Err(McpError::Config(format!("unknown option '{}'", other))),
        }
    }

    Ok(Command::Serve(overrides))
}

fn value_for(flag: &str, value: Option<String>) -> McpResult<String> {
    match value {
        Some(v) if !v.starts_with("--") => Ok(v),
        _ => Err(McpError::Config(format!("{} requires a value", flag))),
    }
}
