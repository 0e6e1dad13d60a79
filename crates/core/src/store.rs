//! The remote document store as seen by the content operations.
//!
//! [`BlockStore`] is the seam between the drivers and the network. [`crate::NotionClient`]
//! implements it over HTTP; tests implement it in memory.

use crate::blocks::Block;
use crate::pagination::Page;
use crate::NotionResult;
use async_trait::async_trait;
use ntn_types::NotionId;
use serde::Deserialize;
use serde_json::{Map, Value};

/// A block as returned by the remote, with its remote-assigned ID.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RemoteBlock {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub has_children: bool,
    /// Remaining fields, including the type-specific body keyed by `kind`.
    #[serde(flatten)]
    pub body: Map<String, Value>,
}

impl RemoteBlock {
    /// The type-specific body, e.g. `{"rich_text": [...]}` for a paragraph.
    pub fn content(&self) -> Option<&Value> {
        self.body.get(&self.kind)
    }
}

/// Remote capabilities the content operations depend on.
///
/// Implementations must not retry; every failure is returned to the caller as-is.
#[async_trait]
pub trait BlockStore: Send + Sync {
    /// One page of a container's children, starting at `cursor`.
    async fn fetch_children_page(
        &self,
        container_id: &NotionId,
        cursor: Option<&str>,
        page_size: usize,
    ) -> NotionResult<Page<RemoteBlock>>;

    /// Appends up to `MAX_CHUNK_SIZE` blocks to the end of a container.
    async fn append_children(&self, container_id: &NotionId, blocks: &[Block]) -> NotionResult<()>;

    /// Deletes (archives) a single block by its remote ID.
    async fn delete_item(&self, item_id: &str) -> NotionResult<()>;

    /// One page of rows from a database, optionally filtered.
    async fn query_rows(
        &self,
        source_id: &NotionId,
        filter: Option<&Value>,
        cursor: Option<&str>,
        page_size: usize,
    ) -> NotionResult<Page<Value>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_remote_block_keeps_type_body() {
        let raw = json!({
            "object": "block",
            "id": "abc",
            "type": "paragraph",
            "has_children": false,
            "paragraph": {"rich_text": [{"plain_text": "hi"}]}
        });
        let block: RemoteBlock = serde_json::from_value(raw).unwrap();
        assert_eq!(block.id, "abc");
        assert_eq!(block.kind, "paragraph");
        assert_eq!(
            block.content(),
            Some(&json!({"rich_text": [{"plain_text": "hi"}]}))
        );
    }

    #[test]
    fn test_page_deserializes_list_response() {
        let raw = json!({
            "object": "list",
            "results": [{"id": "a", "type": "divider", "divider": {}}],
            "next_cursor": "cursor-2",
            "has_more": true
        });
        let page: Page<RemoteBlock> = serde_json::from_value(raw).unwrap();
        assert_eq!(page.items.len(), 1);
        assert!(page.has_more);
        assert_eq!(page.next_cursor.as_deref(), Some("cursor-2"));
    }
}
