// Notion API Client - authenticated reqwest wrapper around the public REST API
use super::{api::NotionApi, params::*};
use crate::{
    config::NotionConfig,
    errors::{McpError, McpResult},
};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, Url};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

pub struct NotionClient {
    base_url: Url,
    http_client: reqwest::Client,
}

impl NotionClient {
    pub fn new(config: &NotionConfig) -> McpResult<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| McpError::Config(format!("invalid Notion base URL '{}': {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(McpError::Config(format!(
                "Notion base URL '{}' cannot carry a path",
                config.base_url
            )));
        }

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|_| McpError::Config("NOTION_API_KEY contains invalid characters".to_string()))?;
        auth.set_sensitive(true);

        let version = HeaderValue::from_str(&config.api_version)
            .map_err(|_| McpError::Config(format!("invalid Notion API version '{}'", config.api_version)))?;

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert("Notion-Version", version);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!("notion-mcp/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| McpError::Internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { base_url, http_client })
    }

    /// `/v1/<segments...>` under the configured base URL. Segments are percent-encoded,
    /// so identifiers can never escape their path position.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push("v1").extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> (RequestBuilder, Url) {
        let url = self.endpoint(segments);
        (self.http_client.request(method, url.clone()), url)
    }

    async fn get(&self, segments: &[&str]) -> McpResult<Value> {
        let (request, url) = self.request(Method::GET, segments);
        self.execute(Method::GET, &url, request).await
    }

    async fn delete(&self, segments: &[&str]) -> McpResult<Value> {
        let (request, url) = self.request(Method::DELETE, segments);
        self.execute(Method::DELETE, &url, request).await
    }

    async fn send_json<B>(&self, method: Method, segments: &[&str], body: &B) -> McpResult<Value>
    where
        B: Serialize + ?Sized,
    {
        let (request, url) = self.request(method.clone(), segments);
        self.execute(method, &url, request.json(body)).await
    }

    async fn execute(&self, method: Method, url: &Url, request: RequestBuilder) -> McpResult<Value> {
        debug!(%method, path = url.path(), "📡 Calling Notion API");

        let response = request.send().await.map_err(|e| {
            warn!(%method, path = url.path(), error = %e, "Notion request failed");
            McpError::from(e)
        })?;

        let status = response.status();
        let body = response.text().await.map_err(McpError::from)?;

        if !status.is_success() {
            let err = McpError::from_upstream(status.as_u16(), &body);
            warn!(%method, path = url.path(), status = status.as_u16(), error = %err, "Notion API error");
            return Err(err);
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&body)
            .map_err(|e| McpError::Internal(format!("Notion returned invalid JSON: {}", e)))
    }
}

#[async_trait]
impl NotionApi for NotionClient {
    async fn get_page(&self, page_id: &str) -> McpResult<Value> {
        self.get(&["pages", page_id]).await
    }

    async fn update_page(&self, update: &PageUpdate) -> McpResult<Value> {
        self.send_json(Method::PATCH, &["pages", update.page_id.as_str()], update).await
    }

    async fn create_page(&self, page: &NewPage) -> McpResult<Value> {
        self.send_json(Method::POST, &["pages"], page).await
    }

    async fn get_database(&self, database_id: &str) -> McpResult<Value> {
        self.get(&["databases", database_id]).await
    }

    async fn query_database(&self, query: &DatabaseQuery) -> McpResult<Value> {
        self.send_json(Method::POST, &["databases", query.database_id.as_str(), "query"], query)
            .await
    }

    async fn create_database(&self, database: &NewDatabase) -> McpResult<Value> {
        self.send_json(Method::POST, &["databases"], database).await
    }

    async fn update_database(&self, update: &DatabaseUpdate) -> McpResult<Value> {
        self.send_json(Method::PATCH, &["databases", update.database_id.as_str()], update)
            .await
    }

    async fn get_block(&self, block_id: &str) -> McpResult<Value> {
        self.get(&["blocks", block_id]).await
    }

    async fn update_block(&self, update: &BlockUpdate) -> McpResult<Value> {
        self.send_json(Method::PATCH, &["blocks", update.block_id.as_str()], &update.content)
            .await
    }

    async fn list_blocks(&self, query: &BlockChildrenQuery) -> McpResult<Value> {
        let (request, url) = self.request(Method::GET, &["blocks", query.block_id.as_str(), "children"]);
        self.execute(Method::GET, &url, request.query(query)).await
    }

    async fn append_blocks(&self, append: &BlockAppend) -> McpResult<Value> {
        self.send_json(Method::PATCH, &["blocks", append.block_id.as_str(), "children"], append)
            .await
    }

    async fn delete_block(&self, block_id: &str) -> McpResult<Value> {
        self.delete(&["blocks", block_id]).await
    }

    async fn search(&self, query: &SearchQuery) -> McpResult<Value> {
        self.send_json(Method::POST, &["search"], query).await
    }

    async fn create_comment(&self, comment: &NewComment) -> McpResult<Value> {
        self.send_json(Method::POST, &["comments"], comment).await
    }

    async fn get_comment(&self, comment_id: &str) -> McpResult<Value> {
        self.get(&["comments", comment_id]).await
    }
}

impl std::fmt::Debug for NotionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotionClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}
