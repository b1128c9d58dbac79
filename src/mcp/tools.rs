// Tool Registry - definitions, schemas and handlers for every Notion tool
// Handlers validate synchronously before returning the future that calls Notion
use super::types::McpTool;
use crate::{
    errors::{McpError, McpResult},
    notion::{
        params::{self, Validate},
        NotionApi,
    },
};
use futures::future::BoxFuture;
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

pub type ToolFuture = BoxFuture<'static, McpResult<Value>>;
pub type ToolHandler = fn(Arc<dyn NotionApi>, Value) -> McpResult<ToolFuture>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolId {
    GetPage,
    UpdatePage,
    CreatePage,
    GetDatabase,
    QueryDatabase,
    CreateDatabase,
    UpdateDatabase,
    GetBlock,
    UpdateBlock,
    ListBlocks,
    AppendBlocks,
    DeleteBlock,
    Search,
    CreateComment,
    GetComment,
}

impl ToolId {
    /// Registration order, which is also the order `tools/list` reports.
    pub const ALL: [ToolId; 15] = [
        ToolId::GetPage,
        ToolId::UpdatePage,
        ToolId::CreatePage,
        ToolId::GetDatabase,
        ToolId::QueryDatabase,
        ToolId::CreateDatabase,
        ToolId::UpdateDatabase,
        ToolId::GetBlock,
        ToolId::UpdateBlock,
        ToolId::ListBlocks,
        ToolId::AppendBlocks,
        ToolId::DeleteBlock,
        ToolId::Search,
        ToolId::CreateComment,
        ToolId::GetComment,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ToolId::GetPage => "get_page",
            ToolId::UpdatePage => "update_page",
            ToolId::CreatePage => "create_page",
            ToolId::GetDatabase => "get_database",
            ToolId::QueryDatabase => "query_database",
            ToolId::CreateDatabase => "create_database",
            ToolId::UpdateDatabase => "update_database",
            ToolId::GetBlock => "get_block",
            ToolId::UpdateBlock => "update_block",
            ToolId::ListBlocks => "list_blocks",
            ToolId::AppendBlocks => "append_blocks",
            ToolId::DeleteBlock => "delete_block",
            ToolId::Search => "search",
            ToolId::CreateComment => "create_comment",
            ToolId::GetComment => "get_comment",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.name() == name)
    }

    pub fn description(self) -> &'static str {
        match self {
            ToolId::GetPage => "Get a Notion page by ID",
            ToolId::UpdatePage => "Update a Notion page's properties",
            ToolId::CreatePage => "Create a new Notion page",
            ToolId::GetDatabase => "Get a Notion database by ID",
            ToolId::QueryDatabase => {
                "Query a Notion database. Returns one page of results; pass next_cursor back as start_cursor to continue"
            }
            ToolId::CreateDatabase => "Create a new Notion database under a page",
            ToolId::UpdateDatabase => "Update a Notion database's title, properties, icon or cover",
            ToolId::GetBlock => "Get a Notion block by ID",
            ToolId::UpdateBlock => "Update a Notion block's content",
            ToolId::ListBlocks => {
                "List a Notion block's children. Returns one page of results; pass next_cursor back as start_cursor to continue"
            }
            ToolId::AppendBlocks => "Append blocks to a Notion block's children",
            ToolId::DeleteBlock => "Delete (archive) a Notion block",
            ToolId::Search => "Search for Notion pages and databases shared with the integration",
            ToolId::CreateComment => "Add a comment to a Notion page or discussion thread",
            ToolId::GetComment => "Get a Notion comment by ID",
        }
    }

    pub fn input_schema(self) -> Value {
        match self {
            ToolId::GetPage => object_schema(
                &["page_id"],
                json!({ "page_id": string_prop("The ID of the page to get") }),
            ),
            ToolId::UpdatePage => object_schema(
                &["page_id", "properties"],
                json!({
                    "page_id": string_prop("The ID of the page to update"),
                    "properties": object_prop("Properties to update"),
                }),
            ),
            ToolId::CreatePage => object_schema(
                &["parent", "properties"],
                json!({
                    "parent": object_prop("Parent object (database_id or page_id)"),
                    "properties": object_prop("Page properties"),
                    "children": array_prop("Children blocks"),
                }),
            ),
            ToolId::GetDatabase => object_schema(
                &["database_id"],
                json!({ "database_id": string_prop("The ID of the database to get") }),
            ),
            ToolId::QueryDatabase => object_schema(
                &["database_id"],
                json!({
                    "database_id": string_prop("The ID of the database to query"),
                    "filter": object_prop("Filter to apply to the database query"),
                    "sorts": array_prop("Sort order for the database query"),
                    "start_cursor": string_prop("Pagination cursor"),
                    "page_size": page_size_prop(),
                }),
            ),
            ToolId::CreateDatabase => object_schema(
                &["parent", "title", "properties"],
                json!({
                    "parent": object_prop("Parent object (page_id)"),
                    "title": array_prop("Title of the database as rich text"),
                    "properties": object_prop("Database properties schema"),
                    "icon": object_prop("Icon object"),
                    "cover": object_prop("Cover object"),
                    "is_inline": { "type": "boolean", "description": "Whether the database is inline" },
                }),
            ),
            ToolId::UpdateDatabase => object_schema(
                &["database_id"],
                json!({
                    "database_id": string_prop("The ID of the database to update"),
                    "title": array_prop("Title of the database as rich text"),
                    "properties": object_prop("Database properties schema"),
                    "icon": object_prop("Icon object"),
                    "cover": object_prop("Cover object"),
                    "is_inline": { "type": "boolean", "description": "Whether the database is inline" },
                }),
            ),
            ToolId::GetBlock => object_schema(
                &["block_id"],
                json!({ "block_id": string_prop("The ID of the block to get") }),
            ),
            ToolId::UpdateBlock => object_schema(
                &["block_id", "content"],
                json!({
                    "block_id": string_prop("The ID of the block to update"),
                    "content": object_prop("Content to update"),
                }),
            ),
            ToolId::ListBlocks => object_schema(
                &["block_id"],
                json!({
                    "block_id": string_prop("The ID of the block to list children for"),
                    "start_cursor": string_prop("Pagination cursor"),
                    "page_size": page_size_prop(),
                }),
            ),
            ToolId::AppendBlocks => object_schema(
                &["block_id", "children"],
                json!({
                    "block_id": string_prop("The ID of the block to append children to"),
                    "children": array_prop("Children blocks to append"),
                }),
            ),
            ToolId::DeleteBlock => object_schema(
                &["block_id"],
                json!({ "block_id": string_prop("The ID of the block to delete") }),
            ),
            ToolId::Search => object_schema(
                &[],
                json!({
                    "query": string_prop("Search query"),
                    "sort": object_prop("Sort order for search results"),
                    "filter": object_prop("Filter to apply to search results"),
                    "start_cursor": string_prop("Pagination cursor"),
                    "page_size": page_size_prop(),
                }),
            ),
            ToolId::CreateComment => object_schema(
                &["parent", "rich_text"],
                json!({
                    "parent": object_prop("Parent object (page_id)"),
                    "rich_text": array_prop("Rich text content of the comment"),
                    "discussion_id": string_prop("ID of the discussion thread to reply to"),
                }),
            ),
            ToolId::GetComment => object_schema(
                &["comment_id"],
                json!({ "comment_id": string_prop("The ID of the comment to get") }),
            ),
        }
    }

    fn handler(self) -> ToolHandler {
        match self {
            ToolId::GetPage => get_page,
            ToolId::UpdatePage => update_page,
            ToolId::CreatePage => create_page,
            ToolId::GetDatabase => get_database,
            ToolId::QueryDatabase => query_database,
            ToolId::CreateDatabase => create_database,
            ToolId::UpdateDatabase => update_database,
            ToolId::GetBlock => get_block,
            ToolId::UpdateBlock => update_block,
            ToolId::ListBlocks => list_blocks,
            ToolId::AppendBlocks => append_blocks,
            ToolId::DeleteBlock => delete_block,
            ToolId::Search => search,
            ToolId::CreateComment => create_comment,
            ToolId::GetComment => get_comment,
        }
    }

    pub fn definition(self) -> McpTool {
        McpTool {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.input_schema(),
        }
    }
}

fn object_schema(required: &[&str], properties: Value) -> Value {
    json!({
        "type": "object",
        "required": required,
        "properties": properties,
        "additionalProperties": false,
    })
}

fn string_prop(description: &str) -> Value {
    json!({ "type": "string", "description": description })
}

fn object_prop(description: &str) -> Value {
    json!({ "type": "object", "description": description })
}

fn array_prop(description: &str) -> Value {
    json!({ "type": "array", "description": description })
}

fn page_size_prop() -> Value {
    json!({
        "type": "integer",
        "minimum": 1,
        "maximum": params::MAX_PAGE_SIZE,
        "description": "Number of results to return per page",
    })
}

pub struct RegisteredTool {
    pub id: ToolId,
    pub definition: McpTool,
    handler: ToolHandler,
}

impl RegisteredTool {
    /// Validate `arguments` and return the pending upstream call.
    pub fn prepare(&self, client: Arc<dyn NotionApi>, arguments: Value) -> McpResult<ToolFuture> {
        (self.handler)(client, arguments)
    }
}

/// Read-only after construction.
pub struct ToolRegistry {
    tools: Vec<RegisteredTool>,
    index: HashMap<&'static str, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            tools: Vec::with_capacity(ToolId::ALL.len()),
            index: HashMap::with_capacity(ToolId::ALL.len()),
        };
        for id in ToolId::ALL {
            registry.register(id);
        }
        registry
    }

    fn register(&mut self, id: ToolId) {
        let previous = self.index.insert(id.name(), self.tools.len());
        debug_assert!(previous.is_none(), "tool {} registered twice", id.name());
        self.tools.push(RegisteredTool {
            id,
            definition: id.definition(),
            handler: id.handler(),
        });
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredTool> {
        self.index.get(name).map(|&i| &self.tools[i])
    }

    pub fn definitions(&self) -> Vec<McpTool> {
        self.tools.iter().map(|t| t.definition.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_args<T>(tool: ToolId, arguments: Value) -> McpResult<T>
where
    T: DeserializeOwned + Validate,
{
    let arguments = match arguments {
        Value::Null => Value::Object(Map::new()),
        obj @ Value::Object(_) => obj,
        other => {
            return Err(McpError::InvalidArguments(format!(
                "{}: arguments must be a JSON object, got {}",
                tool.name(),
                json_type(&other)
            )))
        }
    };

    let parsed: T = serde_json::from_value(arguments)
        .map_err(|e| McpError::InvalidArguments(format!("{}: {}", tool.name(), e)))?;
    parsed
        .validate()
        .map_err(|detail| McpError::InvalidArguments(format!("{}: {}", tool.name(), detail)))?;
    Ok(parsed)
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn get_page(client: Arc<dyn NotionApi>, arguments: Value) -> McpResult<ToolFuture> {
    let args: params::PageRef = parse_args(ToolId::GetPage, arguments)?;
    Ok(Box::pin(async move { client.get_page(&args.page_id).await }))
}

fn update_page(client: Arc<dyn NotionApi>, arguments: Value) -> McpResult<ToolFuture> {
    let args: params::PageUpdate = parse_args(ToolId::UpdatePage, arguments)?;
    Ok(Box::pin(async move { client.update_page(&args).await }))
}

fn create_page(client: Arc<dyn NotionApi>, arguments: Value) -> McpResult<ToolFuture> {
    let args: params::NewPage = parse_args(ToolId::CreatePage, arguments)?;
    Ok(Box::pin(async move { client.create_page(&args).await }))
}

fn get_database(client: Arc<dyn NotionApi>, arguments: Value) -> McpResult<ToolFuture> {
    let args: params::DatabaseRef = parse_args(ToolId::GetDatabase, arguments)?;
    Ok(Box::pin(async move { client.get_database(&args.database_id).await }))
}

fn query_database(client: Arc<dyn NotionApi>, arguments: Value) -> McpResult<ToolFuture> {
    let args: params::DatabaseQuery = parse_args(ToolId::QueryDatabase, arguments)?;
    Ok(Box::pin(async move { client.query_database(&args).await }))
}

fn create_database(client: Arc<dyn NotionApi>, arguments: Value) -> McpResult<ToolFuture> {
    let args: params::NewDatabase = parse_args(ToolId::CreateDatabase, arguments)?;
    Ok(Box::pin(async move { client.create_database(&args).await }))
}

fn update_database(client: Arc<dyn NotionApi>, arguments: Value) -> McpResult<ToolFuture> {
    let args: params::DatabaseUpdate = parse_args(ToolId::UpdateDatabase, arguments)?;
    Ok(Box::pin(async move { client.update_database(&args).await }))
}

fn get_block(client: Arc<dyn NotionApi>, arguments: Value) -> McpResult<ToolFuture> {
    let args: params::BlockRef = parse_args(ToolId::GetBlock, arguments)?;
    Ok(Box::pin(async move { client.get_block(&args.block_id).await }))
}

fn update_block(client: Arc<dyn NotionApi>, arguments: Value) -> McpResult<ToolFuture> {
    let args: params::BlockUpdate = parse_args(ToolId::UpdateBlock, arguments)?;
    Ok(Box::pin(async move { client.update_block(&args).await }))
}

fn list_blocks(client: Arc<dyn NotionApi>, arguments: Value) -> McpResult<ToolFuture> {
    let args: params::BlockChildrenQuery = parse_args(ToolId::ListBlocks, arguments)?;
    Ok(Box::pin(async move { client.list_blocks(&args).await }))
}

fn append_blocks(client: Arc<dyn NotionApi>, arguments: Value) -> McpResult<ToolFuture> {
    let args: params::BlockAppend = parse_args(ToolId::AppendBlocks, arguments)?;
    Ok(Box::pin(async move { client.append_blocks(&args).await }))
}

fn delete_block(client: Arc<dyn NotionApi>, arguments: Value) -> McpResult<ToolFuture> {
    let args: params::BlockRef = parse_args(ToolId::DeleteBlock, arguments)?;
    Ok(Box::pin(async move { client.delete_block(&args.block_id).await }))
}

fn search(client: Arc<dyn NotionApi>, arguments: Value) -> McpResult<ToolFuture> {
    let args: params::SearchQuery = parse_args(ToolId::Search, arguments)?;
    Ok(Box::pin(async move { client.search(&args).await }))
}

fn create_comment(client: Arc<dyn NotionApi>, arguments: Value) -> McpResult<ToolFuture> {
    let args: params::NewComment = parse_args(ToolId::CreateComment, arguments)?;
    Ok(Box::pin(async move { client.create_comment(&args).await }))
}

fn get_comment(client: Arc<dyn NotionApi>, arguments: Value) -> McpResult<ToolFuture> {
    let args: params::CommentRef = parse_args(ToolId::GetComment, arguments)?;
    Ok(Box::pin(async move { client.get_comment(&args.comment_id).await }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn registry_names_are_unique_and_ordered() {
        let registry = ToolRegistry::new();
        let definitions = registry.definitions();

        assert_eq!(registry.len(), ToolId::ALL.len());
        let names: Vec<&str> = definitions.iter().map(|d| d.name.as_str()).collect();
        let unique: HashSet<&str> = names.iter().copied().collect();
        assert_eq!(unique.len(), names.len());

        let expected: Vec<&str> = ToolId::ALL.iter().map(|id| id.name()).collect();
        assert_eq!(names, expected);
        assert_eq!(names[0], "get_page");
    }

    #[test]
    fn every_name_resolves_to_its_own_entry() {
        let registry = ToolRegistry::new();
        for id in ToolId::ALL {
            assert_eq!(ToolId::from_name(id.name()), Some(id));
            assert_eq!(registry.get(id.name()).map(|t| t.id), Some(id));
        }
        assert!(registry.get("drop_database").is_none());
        assert_eq!(ToolId::from_name("GET_PAGE"), None);
    }

    #[test]
    fn schemas_are_closed_objects() {
        for id in ToolId::ALL {
            let schema = id.input_schema();
            assert_eq!(schema["type"], "object", "{}", id.name());
            assert_eq!(schema["additionalProperties"], false, "{}", id.name());

            let properties = schema["properties"].as_object().unwrap();
            for required in schema["required"].as_array().unwrap() {
                let field = required.as_str().unwrap();
                assert!(properties.contains_key(field), "{} requires undeclared {}", id.name(), field);
            }
        }
    }

    #[test]
    fn non_object_arguments_are_rejected() {
        let err = parse_args::<params::PageRef>(ToolId::GetPage, json!(["abc"])).unwrap_err();
        assert!(matches!(err, McpError::InvalidArguments(ref d) if d.contains("array")));
    }

    #[test]
    fn null_arguments_mean_empty_object() {
        let search: params::SearchQuery = parse_args(ToolId::Search, Value::Null).unwrap();
        assert!(search.query.is_none());

        let err = parse_args::<params::PageRef>(ToolId::GetPage, Value::Null).unwrap_err();
        assert!(err.to_string().contains("page_id"));
    }
}
