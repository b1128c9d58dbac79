// Notion request shapes - strict tool arguments that double as request bodies
// Path identifiers are skipped when serializing; they travel in the URL
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Largest page Notion will return for paginated endpoints.
pub const MAX_PAGE_SIZE: u32 = 100;

pub type JsonObject = Map<String, Value>;

/// Semantic checks that serde cannot express.
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

fn require_id(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("'{}' must not be empty", field))
    } else {
        Ok(())
    }
}

fn check_page_size(page_size: Option<u32>) -> Result<(), String> {
    match page_size {
        Some(size) if size == 0 || size > MAX_PAGE_SIZE => Err(format!(
            "'page_size' must be between 1 and {}, got {}",
            MAX_PAGE_SIZE, size
        )),
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageRef {
    pub page_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageUpdate {
    #[serde(skip_serializing)]
    pub page_id: String,
    pub properties: JsonObject,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewPage {
    pub parent: JsonObject,
    pub properties: JsonObject,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseRef {
    pub database_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseQuery {
    #[serde(skip_serializing)]
    pub database_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<JsonObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sorts: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewDatabase {
    pub parent: JsonObject,
    pub title: Vec<Value>,
    pub properties: JsonObject,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<JsonObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<JsonObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_inline: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseUpdate {
    #[serde(skip_serializing)]
    pub database_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<JsonObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<JsonObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<JsonObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_inline: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BlockRef {
    pub block_id: String,
}

/// The block body is sent as-is, e.g. `{"paragraph": {"rich_text": [...]}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BlockUpdate {
    #[serde(skip_serializing)]
    pub block_id: String,
    pub content: JsonObject,
}

/// Sent as query parameters, not as a body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BlockChildrenQuery {
    #[serde(skip_serializing)]
    pub block_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BlockAppend {
    #[serde(skip_serializing)]
    pub block_id: String,
    pub children: Vec<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<JsonObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<JsonObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewComment {
    pub parent: JsonObject,
    pub rich_text: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discussion_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommentRef {
    pub comment_id: String,
}

impl Validate for PageRef {
    fn validate(&self) -> Result<(), String> {
        require_id("page_id", &self.page_id)
    }
}

impl Validate for PageUpdate {
    fn validate(&self) -> Result<(), String> {
        require_id("page_id", &self.page_id)
    }
}

impl Validate for NewPage {
    fn validate(&self) -> Result<(), String> {
        if self.parent.is_empty() {
            return Err("'parent' must name a page_id or database_id".to_string());
        }
        Ok(())
    }
}

impl Validate for DatabaseRef {
    fn validate(&self) -> Result<(), String> {
        require_id("database_id", &self.database_id)
    }
}

impl Validate for DatabaseQuery {
    fn validate(&self) -> Result<(), String> {
        require_id("database_id", &self.database_id)?;
        check_page_size(self.page_size)
    }
}

impl Validate for NewDatabase {
    fn validate(&self) -> Result<(), String> {
        if self.parent.is_empty() {
            return Err("'parent' must name a page_id".to_string());
        }
        Ok(())
    }
}

impl Validate for DatabaseUpdate {
    fn validate(&self) -> Result<(), String> {
        require_id("database_id", &self.database_id)
    }
}

impl Validate for BlockRef {
    fn validate(&self) -> Result<(), String> {
        require_id("block_id", &self.block_id)
    }
}

impl Validate for BlockUpdate {
    fn validate(&self) -> Result<(), String> {
        require_id("block_id", &self.block_id)
    }
}

impl Validate for BlockChildrenQuery {
    fn validate(&self) -> Result<(), String> {
        require_id("block_id", &self.block_id)?;
        check_page_size(self.page_size)
    }
}

impl Validate for BlockAppend {
    fn validate(&self) -> Result<(), String> {
        require_id("block_id", &self.block_id)?;
        if self.children.is_empty() {
            return Err("'children' must contain at least one block".to_string());
        }
        Ok(())
    }
}

impl Validate for SearchQuery {
    fn validate(&self) -> Result<(), String> {
        check_page_size(self.page_size)
    }
}

impl Validate for NewComment {
    fn validate(&self) -> Result<(), String> {
        if self.parent.is_empty() {
            return Err("'parent' must name a page_id or block_id".to_string());
        }
        Ok(())
    }
}

impl Validate for CommentRef {
    fn validate(&self) -> Result<(), String> {
        require_id("comment_id", &self.comment_id)
    }
}
