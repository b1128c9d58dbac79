// In-memory NotionApi used by unit tests
use super::{api::NotionApi, params::*};
use crate::errors::{McpError, McpResult};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Mutex;

enum Reply {
    Json(Value),
    Status(u16, String),
}

#[derive(Debug, Clone)]
pub struct Call {
    pub method: &'static str,
    pub args: Value,
}

pub struct MockNotion {
    reply: Reply,
    calls: Mutex<Vec<Call>>,
}

impl MockNotion {
    pub fn returning(value: Value) -> Self {
        Self {
            reply: Reply::Json(value),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(status: u16, body: &str) -> Self {
        Self {
            reply: Reply::Status(status, body.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn record(&self, method: &'static str, args: Value) -> McpResult<Value> {
        self.calls.lock().unwrap().push(Call { method, args });
        match &self.reply {
            Reply::Json(value) => Ok(value.clone()),
            Reply::Status(status, body) => Err(McpError::from_upstream(*status, body)),
        }
    }
}

fn with_id(key: &str, id: &str, body: Value) -> Value {
    json!({ key: id, "body": body })
}

#[async_trait]
impl NotionApi for MockNotion {
    async fn get_page(&self, page_id: &str) -> McpResult<Value> {
        self.record("get_page", json!({ "page_id": page_id }))
    }

    async fn update_page(&self, update: &PageUpdate) -> McpResult<Value> {
        self.record("update_page", with_id("page_id", &update.page_id, json!(update)))
    }

    async fn create_page(&self, page: &NewPage) -> McpResult<Value> {
        self.record("create_page", json!(page))
    }

    async fn get_database(&self, database_id: &str) -> McpResult<Value> {
        self.record("get_database", json!({ "database_id": database_id }))
    }

    async fn query_database(&self, query: &DatabaseQuery) -> McpResult<Value> {
        self.record("query_database", with_id("database_id", &query.database_id, json!(query)))
    }

    async fn create_database(&self, database: &NewDatabase) -> McpResult<Value> {
        self.record("create_database", json!(database))
    }

    async fn update_database(&self, update: &DatabaseUpdate) -> McpResult<Value> {
        self.record("update_database", with_id("database_id", &update.database_id, json!(update)))
    }

    async fn get_block(&self, block_id: &str) -> McpResult<Value> {
        self.record("get_block", json!({ "block_id": block_id }))
    }

    async fn update_block(&self, update: &BlockUpdate) -> McpResult<Value> {
        self.record("update_block", with_id("block_id", &update.block_id, json!(update.content)))
    }

    async fn list_blocks(&self, query: &BlockChildrenQuery) -> McpResult<Value> {
        self.record("list_blocks", with_id("block_id", &query.block_id, json!(query)))
    }

    async fn append_blocks(&self, append: &BlockAppend) -> McpResult<Value> {
        self.record("append_blocks", with_id("block_id", &append.block_id, json!(append)))
    }

    async fn delete_block(&self, block_id: &str) -> McpResult<Value> {
        self.record("delete_block", json!({ "block_id": block_id }))
    }

    async fn search(&self, query: &SearchQuery) -> McpResult<Value> {
        self.record("search", json!(query))
    }

    async fn create_comment(&self, comment: &NewComment) -> McpResult<Value> {
        self.record("create_comment", json!(comment))
    }

    async fn get_comment(&self, comment_id: &str) -> McpResult<Value> {
        self.record("get_comment", json!({ "comment_id": comment_id }))
    }
}
