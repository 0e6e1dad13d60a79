//! HTTP client for the workspace REST API.
//!
//! [`NotionClient`] is constructed explicitly from a [`CoreConfig`] and passed to whatever needs
//! it; there is no shared global handle. It implements [`BlockStore`] for the content operations
//! and offers the remaining read/update endpoints the command line uses as inherent methods.
//!
//! Every non-success response becomes `NotionError::Api` with the remote's `code` and `message`.
//! Nothing is retried.

use crate::blocks::Block;
use crate::config::CoreConfig;
use crate::constants::{FALLBACK_TITLE_PROPERTY, MAX_CHUNK_SIZE};
use crate::content::append_page_content;
use crate::pagination::{paginate, Page};
use crate::payloads::title_property_name;
use crate::store::{BlockStore, RemoteBlock};
use crate::{NotionError, NotionResult};
use async_trait::async_trait;
use ntn_types::NotionId;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::str::FromStr;

/// Object type filter for search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFilter {
    Page,
    Database,
}

impl SearchFilter {
    fn api_value(self) -> &'static str {
        match self {
            SearchFilter::Page => "page",
            SearchFilter::Database => "database",
        }
    }
}

impl FromStr for SearchFilter {
    type Err = NotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "page" | "pages" => Ok(SearchFilter::Page),
            "database" | "databases" | "data_source" => Ok(SearchFilter::Database),
            other => Err(NotionError::InvalidInput(format!(
                "search type must be 'page' or 'database', got: '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

/// Client for the workspace REST API.
#[derive(Clone, Debug)]
pub struct NotionClient {
    http: reqwest::Client,
    config: CoreConfig,
}

impl NotionClient {
    /// Builds a client for `config`.
    ///
    /// # Errors
    ///
    /// Returns `NotionError::Http` if the underlying HTTP client cannot be initialised.
    pub fn new(config: CoreConfig) -> NotionResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("ntn/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| NotionError::Http {
                operation: "client setup",
                source,
            })?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.config.api_base_url(), path);
        tracing::debug!(%method, %url, "request");
        self.http
            .request(method, url)
            .bearer_auth(self.config.token())
            .header("Notion-Version", self.config.notion_version())
    }

    async fn send<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> NotionResult<T> {
        let response = request
            .send()
            .await
            .map_err(|source| NotionError::Http { operation, source })?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| NotionError::Http { operation, source })?;

        if !status.is_success() {
            let parsed: ApiErrorBody = serde_json::from_str(&body).unwrap_or_default();
            let message = if parsed.message.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("unexpected response")
                    .to_string()
            } else {
                parsed.message
            };
            tracing::debug!(operation, status = status.as_u16(), code = %parsed.code, "remote error");
            return Err(NotionError::Api {
                operation,
                status: status.as_u16(),
                code: if parsed.code.is_empty() {
                    "unknown".to_string()
                } else {
                    parsed.code
                },
                message,
            });
        }

        serde_json::from_str(&body)
            .map_err(|source| NotionError::Deserialization { operation, source })
    }

    /// Searches the workspace, following cursors up to `limit` results.
    pub async fn search(
        &self,
        query: &str,
        filter: Option<SearchFilter>,
        limit: Option<usize>,
    ) -> NotionResult<Vec<Value>> {
        paginate(
            |cursor, page_size| {
                let mut body = Map::new();
                body.insert("query".into(), Value::String(query.to_string()));
                body.insert("page_size".into(), json!(page_size));
                if let Some(filter) = filter {
                    body.insert(
                        "filter".into(),
                        json!({"property": "object", "value": filter.api_value()}),
                    );
                }
                if let Some(cursor) = cursor {
                    body.insert("start_cursor".into(), Value::String(cursor));
                }
                let request = self.request(Method::POST, "search").json(&body);
                self.send("search", request)
            },
            limit,
        )
        .await
    }

    /// Every database shared with the integration.
    pub async fn list_databases(&self) -> NotionResult<Vec<Value>> {
        self.search("", Some(SearchFilter::Database), None).await
    }

    pub async fn get_database(&self, database_id: &NotionId) -> NotionResult<Value> {
        let request = self.request(Method::GET, &format!("databases/{}", database_id));
        self.send("get database", request).await
    }

    /// Name of the database property holding row titles, `Name` if the schema has none.
    pub async fn get_title_property_name(&self, database_id: &NotionId) -> NotionResult<String> {
        let schema = self.get_database(database_id).await?;
        Ok(title_property_name(&schema)
            .unwrap_or(FALLBACK_TITLE_PROPERTY)
            .to_string())
    }

    pub async fn get_page(&self, page_id: &NotionId) -> NotionResult<Value> {
        let request = self.request(Method::GET, &format!("pages/{}", page_id));
        self.send("get page", request).await
    }

    pub async fn update_page(&self, page_id: &NotionId, properties: &Value) -> NotionResult<Value> {
        let request = self
            .request(Method::PATCH, &format!("pages/{}", page_id))
            .json(&json!({ "properties": properties }));
        self.send("update page", request).await
    }

    /// Creates a row in a database with optional content.
    ///
    /// The first `MAX_CHUNK_SIZE` children travel with the create request; any remainder is
    /// appended to the new page afterwards.
    pub async fn create_page(
        &self,
        database_id: &NotionId,
        properties: Value,
        children: &[Block],
    ) -> NotionResult<Value> {
        let (first, rest) = children.split_at(children.len().min(MAX_CHUNK_SIZE));

        let mut body = Map::new();
        body.insert("parent".into(), json!({ "database_id": database_id }));
        body.insert("properties".into(), properties);
        if !first.is_empty() {
            let children = serde_json::to_value(first).map_err(|source| {
                NotionError::Serialization {
                    operation: "create page",
                    source,
                }
            })?;
            body.insert("children".into(), children);
        }

        let request = self.request(Method::POST, "pages").json(&body);
        let created: Value = self.send("create page", request).await?;

        if !rest.is_empty() {
            let page_id = created
                .get("id")
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    NotionError::InvalidInput("create page response has no id".into())
                })?
                .parse::<NotionId>()?;
            append_page_content(self, &page_id, rest).await?;
        }

        Ok(created)
    }

    pub async fn get_block(&self, block_id: &NotionId) -> NotionResult<Value> {
        let request = self.request(Method::GET, &format!("blocks/{}", block_id));
        self.send("get block", request).await
    }

    /// Sends a block update payload such as `{"paragraph": {"rich_text": [...]}}`.
    pub async fn update_block(&self, block_id: &NotionId, payload: &Value) -> NotionResult<Value> {
        let request = self
            .request(Method::PATCH, &format!("blocks/{}", block_id))
            .json(payload);
        self.send("update block", request).await
    }
}

#[async_trait]
impl BlockStore for NotionClient {
    async fn fetch_children_page(
        &self,
        container_id: &NotionId,
        cursor: Option<&str>,
        page_size: usize,
    ) -> NotionResult<Page<RemoteBlock>> {
        let mut query = vec![("page_size", page_size.to_string())];
        if let Some(cursor) = cursor {
            query.push(("start_cursor", cursor.to_string()));
        }
        let request = self
            .request(Method::GET, &format!("blocks/{}/children", container_id))
            .query(&query);
        self.send("list children", request).await
    }

    async fn append_children(&self, container_id: &NotionId, blocks: &[Block]) -> NotionResult<()> {
        if blocks.len() > MAX_CHUNK_SIZE {
            return Err(NotionError::InvalidInput(format!(
                "cannot append {} blocks in one request (limit {})",
                blocks.len(),
                MAX_CHUNK_SIZE
            )));
        }
        let request = self
            .request(Method::PATCH, &format!("blocks/{}/children", container_id))
            .json(&json!({ "children": blocks }));
        let _: Value = self.send("append children", request).await?;
        Ok(())
    }

    async fn delete_item(&self, item_id: &str) -> NotionResult<()> {
        let request = self.request(Method::DELETE, &format!("blocks/{}", item_id));
        let _: Value = self.send("delete block", request).await?;
        Ok(())
    }

    async fn query_rows(
        &self,
        source_id: &NotionId,
        filter: Option<&Value>,
        cursor: Option<&str>,
        page_size: usize,
    ) -> NotionResult<Page<Value>> {
        let mut body = Map::new();
        body.insert("page_size".into(), json!(page_size));
        if let Some(filter) = filter {
            body.insert("filter".into(), filter.clone());
        }
        if let Some(cursor) = cursor {
            body.insert("start_cursor".into(), Value::String(cursor.to_string()));
        }
        let request = self
            .request(Method::POST, &format!("databases/{}/query", source_id))
            .json(&body);
        self.send("query database", request).await
    }
}
