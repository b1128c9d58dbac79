// MCP Error Types
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type McpResult<T> = Result<T, McpError>;

#[derive(Debug, Error)]
pub enum McpError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Notion object not found (status 404, {code}): {message}")]
    NotFound { code: String, message: String },

    #[error("Notion permission denied (status {status}, {code}): {message}")]
    PermissionDenied {
        status: u16,
        code: String,
        message: String,
    },

    #[error("Notion rejected the request (status {status}, {code}): {message}")]
    UpstreamRejected {
        status: u16,
        code: String,
        message: String,
    },

    #[error("Notion unavailable{}: {}", status_suffix(.status), .message)]
    UpstreamUnavailable { status: Option<u16>, message: String },

    #[error("Authentication missing: {0}")]
    AuthenticationMissing(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Method not found: {0}")]
    MethodNotFound(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpErrorResponse {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// Error payload returned by the Notion API on non-2xx responses.
#[derive(Debug, Default, Deserialize)]
struct NotionErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (status {s})")).unwrap_or_default()
}

pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_ERROR: i32 = -32603;

impl McpError {
    /// Classify a non-success Notion response by status code.
    ///
    /// The body is expected to be Notion's error object; when it is not JSON the raw
    /// text is used as the message instead.
    pub fn from_upstream(status: u16, body: &str) -> Self {
        let parsed: NotionErrorBody = serde_json::from_str(body).unwrap_or_default();
        let code = parsed.code.unwrap_or_else(|| "unknown".to_string());
        let message = parsed
            .message
            .or_else(|| {
                let text = body.trim();
                (!text.is_empty() && serde_json::from_str::<serde_json::Value>(text).is_err())
                    .then(|| text.to_string())
            })
            .unwrap_or_else(|| "Unknown error".to_string());

        match status {
            404 => McpError::NotFound { code, message },
            401 | 403 => McpError::PermissionDenied { status, code, message },
            400..=499 => McpError::UpstreamRejected { status, code, message },
            _ => McpError::UpstreamUnavailable {
                status: Some(status),
                message,
            },
        }
    }

    /// HTTP status reported by Notion, if the error came from a response.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            McpError::NotFound { .. } => Some(404),
            McpError::PermissionDenied { status, .. } | McpError::UpstreamRejected { status, .. } => {
                Some(*status)
            }
            McpError::UpstreamUnavailable { status, .. } => *status,
            _ => None,
        }
    }

    /// Whether a caller could reasonably retry. Nothing in this crate retries on its own.
    pub fn is_transient(&self) -> bool {
        matches!(self, McpError::UpstreamUnavailable { .. })
    }

    pub fn to_jsonrpc_error(&self) -> McpErrorResponse {
        let code = match self {
            McpError::Json(_) => PARSE_ERROR,
            McpError::InvalidRequest(_) => INVALID_REQUEST,
            McpError::MethodNotFound(_) => METHOD_NOT_FOUND,
            McpError::InvalidArguments(_) => INVALID_PARAMS,
            _ => INTERNAL_ERROR,
        };

        McpErrorResponse {
            code,
            message: self.to_string(),
            data: None,
        }
    }
}

impl From<reqwest::Error> for McpError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return McpError::from_upstream(status.as_u16(), &err.to_string());
        }

        let message = if err.is_timeout() {
            format!("request timed out: {err}")
        } else if err.is_connect() {
            format!("connection failed: {err}")
        } else if err.is_decode() {
            return McpError::Internal(format!("could not decode Notion response: {err}"));
        } else {
            err.to_string()
        };

        McpError::UpstreamUnavailable {
            status: None,
            message,
        }
    }
}
