// Notion MCP Configuration
use crate::errors::{McpError, McpResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_API_VERSION: &str = "2022-06-28";
pub const DEFAULT_BASE_URL: &str = "https://api.notion.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    Stdio,
    Sse,
}

impl FromStr for Transport {
    type Err = McpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stdio" => Ok(Transport::Stdio),
            "sse" => Ok(Transport::Sse),
            other => Err(McpError::Config(format!(
                "unsupported transport '{}', expected 'stdio' or 'sse'",
                other
            ))),
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transport::Stdio => f.write_str("stdio"),
            Transport::Sse => f.write_str("sse"),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct NotionConfig {
    pub api_key: String,
    pub api_version: String,
    pub base_url: String,
    pub request_timeout_secs: u64,
}

// Keeps the credential out of logs.
impl fmt::Debug for NotionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotionConfig")
            .field("api_key", &"<redacted>")
            .field("api_version", &self.api_version)
            .field("base_url", &self.base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub transport: Transport,
    pub host: String,
    pub port: u16,
    pub debug: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            transport: Transport::Stdio,
            host: "0.0.0.0".to_string(),
            port: 8000,
            debug: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpConfig {
    pub notion: NotionConfig,
    pub server: ServerConfig,
}

/// Overrides collected from the command line. `None` leaves the environment value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    pub transport: Option<Transport>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub debug: bool,
}

impl McpConfig {
    pub fn from_env(overrides: &CliOverrides) -> McpResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok(), overrides)
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// A variable that a command-line override replaces is never parsed.
    pub fn from_lookup<F>(lookup: F, overrides: &CliOverrides) -> McpResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("NOTION_API_KEY")
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                McpError::AuthenticationMissing(
                    "Notion API key is required. Set it using the NOTION_API_KEY environment variable"
                        .to_string(),
                )
            })?;

        let base_url = lookup("NOTION_BASE_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let notion = NotionConfig {
            api_key,
            api_version: lookup("NOTION_API_VERSION")
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            base_url,
            request_timeout_secs: parse_var(&lookup, "NOTION_TIMEOUT_SECS", 30)?,
        };

        let defaults = ServerConfig::default();
        let transport = match (overrides.transport, lookup("MCP_TRANSPORT")) {
            (Some(transport), _) => transport,
            (None, Some(raw)) => raw.parse()?,
            (None, None) => defaults.transport,
        };
        let host = match &overrides.host {
            Some(host) => host.clone(),
            None => lookup("MCP_HOST").unwrap_or(defaults.host),
        };
        let port = match overrides.port {
            Some(port) => port,
            None => parse_var(&lookup, "MCP_PORT", defaults.port)?,
        };

        let server = ServerConfig {
            transport,
            host,
            port,
            debug: overrides.debug || parse_flag(lookup("MCP_DEBUG")),
        };

        Ok(Self { notion, server })
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> McpResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| McpError::Config(format!("{}='{}': {}", key, raw, e))),
        None => Ok(default),
    }
}

pub fn parse_flag(raw: Option<String>) -> bool {
    matches!(
        raw.as_deref().map(str::trim).map(str::to_ascii_lowercase).as_deref(),
        Some("1") | Some("true") | Some("yes") | Some("on")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn none() -> CliOverrides {
        CliOverrides::default()
    }

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn missing_api_key_is_fatal() {
        let err = McpConfig::from_lookup(lookup_from(&[]), &none()).unwrap_err();
        assert!(matches!(err, McpError::AuthenticationMissing(_)));

        let err = McpConfig::from_lookup(lookup_from(&[("NOTION_API_KEY", "   ")]), &none()).unwrap_err();
        assert!(matches!(err, McpError::AuthenticationMissing(_)));
    }

    #[test]
    fn defaults_apply() {
        let config = McpConfig::from_lookup(lookup_from(&[("NOTION_API_KEY", "secret_abc")]), &none()).unwrap();

        assert_eq!(config.notion.api_key, "secret_abc");
        assert_eq!(config.notion.api_version, DEFAULT_API_VERSION);
        assert_eq!(config.notion.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.notion.request_timeout_secs, 30);
        assert_eq!(config.server.transport, Transport::Stdio);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8000);
        assert!(!config.server.debug);
    }

    #[test]
    fn environment_overrides() {
        let config = McpConfig::from_lookup(lookup_from(&[
            ("NOTION_API_KEY", "k"),
            ("NOTION_BASE_URL", "http://localhost:9999/"),
            ("NOTION_TIMEOUT_SECS", "5"),
            ("MCP_TRANSPORT", "SSE"),
            ("MCP_PORT", "9100"),
            ("MCP_DEBUG", "true"),
        ]), &none())
        .unwrap();

        assert_eq!(config.notion.base_url, "http://localhost:9999");
        assert_eq!(config.notion.request_timeout_secs, 5);
        assert_eq!(config.server.transport, Transport::Sse);
        assert_eq!(config.server.port, 9100);
        assert!(config.server.debug);
    }

    #[test]
    fn bad_values_name_the_variable() {
        let err = McpConfig::from_lookup(lookup_from(&[
            ("NOTION_API_KEY", "k"),
            ("MCP_PORT", "eighty"),
        ]), &none())
        .unwrap_err();
        assert!(err.to_string().contains("MCP_PORT"));

        let err = McpConfig::from_lookup(lookup_from(&[
            ("NOTION_API_KEY", "k"),
            ("MCP_TRANSPORT", "websocket"),
        ]), &none())
        .unwrap_err();
        assert!(matches!(err, McpError::Config(_)));
    }

    #[test]
    fn cli_overrides_win() {
        let config = McpConfig::from_lookup(
            lookup_from(&[("NOTION_API_KEY", "k"), ("MCP_HOST", "127.0.0.1"), ("MCP_PORT", "8080")]),
            &CliOverrides {
                transport: Some(Transport::Sse),
                host: None,
                port: Some(3000),
                debug: true,
            },
        )
        .unwrap();

        assert_eq!(config.server.transport, Transport::Sse);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert!(config.server.debug);
    }

    #[test]
    fn cli_override_masks_invalid_environment_value() {
        let config = McpConfig::from_lookup(
            lookup_from(&[
                ("NOTION_API_KEY", "k"),
                ("MCP_TRANSPORT", "websocket"),
                ("MCP_PORT", "eighty"),
            ]),
            &CliOverrides {
                transport: Some(Transport::Stdio),
                port: Some(9000),
                ..CliOverrides::default()
            },
        )
        .unwrap();

        assert_eq!(config.server.transport, Transport::Stdio);
        assert_eq!(config.server.port, 9000);
    }

    #[test]
    fn debug_output_hides_key() {
        let config = McpConfig::from_lookup(lookup_from(&[("NOTION_API_KEY", "secret_abc")]), &none()).unwrap();
        let printed = format!("{:?}", config);
        assert!(!printed.contains("secret_abc"));
    }
}
