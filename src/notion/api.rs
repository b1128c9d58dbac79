// Notion API trait - the seam between tool dispatch and the HTTP client
use super::params::*;
use crate::errors::McpResult;
use async_trait::async_trait;
use serde_json::Value;

/// Operations the tool layer can perform against a Notion workspace.
///
/// Every method maps to exactly one upstream request and returns Notion's JSON
/// object unmodified. Paginated endpoints return the first page only; callers
/// follow `next_cursor` themselves.
#[async_trait]
pub trait NotionApi: Send + Sync {
    async fn get_page(&self, page_id: &str) -> McpResult<Value>;

    async fn update_page(&self, update: &PageUpdate) -> McpResult<Value>;

    async fn create_page(&self, page: &NewPage) -> McpResult<Value>;

    async fn get_database(&self, database_id: &str) -> McpResult<Value>;

    async fn query_database(&self, query: &DatabaseQuery) -> McpResult<Value>;

    async fn create_database(&self, database: &NewDatabase) -> McpResult<Value>;

    async fn update_database(&self, update: &DatabaseUpdate) -> McpResult<Value>;

    async fn get_block(&self, block_id: &str) -> McpResult<Value>;

    async fn update_block(&self, update: &BlockUpdate) -> McpResult<Value>;

    async fn list_blocks(&self, query: &BlockChildrenQuery) -> McpResult<Value>;

    async fn append_blocks(&self, append: &BlockAppend) -> McpResult<Value>;

    async fn delete_block(&self, block_id: &str) -> McpResult<Value>;

    async fn search(&self, query: &SearchQuery) -> McpResult<Value>;

    async fn create_comment(&self, comment: &NewComment) -> McpResult<Value>;

    async fn get_comment(&self, comment_id: &str) -> McpResult<Value>;
}
