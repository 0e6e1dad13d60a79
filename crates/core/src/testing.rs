//! In-memory `BlockStore` for driver tests.

use crate::blocks::Block;
use crate::pagination::Page;
use crate::store::{BlockStore, RemoteBlock};
use crate::{NotionError, NotionResult};
use async_trait::async_trait;
use ntn_types::NotionId;
use serde_json::{json, Map, Value};
use std::sync::Mutex;

#[derive(Default)]
struct State {
    children: Vec<RemoteBlock>,
    rows: Vec<Value>,
    next_id: usize,
    append_sizes: Vec<usize>,
    fetches: usize,
    deletes: usize,
    fail_append_call: Option<usize>,
    fail_delete_call: Option<usize>,
}

/// A single-container fake that paginates with numeric cursors.
#[derive(Default)]
pub(crate) struct FakeStore {
    state: Mutex<State>,
}

impl FakeStore {
    pub(crate) fn with_children(count: usize) -> Self {
        let store = Self::default();
        {
            let mut state = store.state.lock().unwrap();
            for _ in 0..count {
                let block = state.remote_paragraph("existing");
                state.children.push(block);
            }
        }
        store
    }

    pub(crate) fn with_rows(count: usize) -> Self {
        let store = Self::default();
        store.state.lock().unwrap().rows = (0..count).map(|i| json!({"id": i})).collect();
        store
    }

    /// Make the `n`th append call (1-based) fail.
    pub(crate) fn fail_append_on(self, n: usize) -> Self {
        self.state.lock().unwrap().fail_append_call = Some(n);
        self
    }

    /// Make the `n`th delete call (1-based) fail.
    pub(crate) fn fail_delete_on(self, n: usize) -> Self {
        self.state.lock().unwrap().fail_delete_call = Some(n);
        self
    }

    pub(crate) fn child_texts(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .children
            .iter()
            .map(|b| b.body["text"].as_str().unwrap_or_default().to_string())
            .collect()
    }

    pub(crate) fn append_sizes(&self) -> Vec<usize> {
        self.state.lock().unwrap().append_sizes.clone()
    }

    pub(crate) fn fetches(&self) -> usize {
        self.state.lock().unwrap().fetches
    }

    pub(crate) fn deletes(&self) -> usize {
        self.state.lock().unwrap().deletes
    }
}

impl State {
    fn remote_paragraph(&mut self, text: &str) -> RemoteBlock {
        self.next_id += 1;
        let mut body = Map::new();
        body.insert("text".into(), Value::String(text.to_string()));
        RemoteBlock {
            id: format!("block-{}", self.next_id),
            kind: "paragraph".into(),
            has_children: false,
            body,
        }
    }
}

fn page_of<T: Clone>(all: &[T], cursor: Option<&str>, page_size: usize) -> Page<T> {
    let start: usize = cursor.and_then(|c| c.parse().ok()).unwrap_or(0);
    let end = (start + page_size).min(all.len());
    let items = all[start.min(end)..end].to_vec();
    if end < all.len() {
        Page::with_more(items, end.to_string())
    } else {
        Page::last(items)
    }
}

fn injected(what: &str) -> NotionError {
    NotionError::Api {
        operation: "fake",
        status: 500,
        code: "internal_server_error".into(),
        message: format!("injected {} failure", what),
    }
}

#[async_trait]
impl BlockStore for FakeStore {
    async fn fetch_children_page(
        &self,
        _container_id: &NotionId,
        cursor: Option<&str>,
        page_size: usize,
    ) -> NotionResult<Page<RemoteBlock>> {
        let mut state = self.state.lock().unwrap();
        state.fetches += 1;
        Ok(page_of(&state.children, cursor, page_size))
    }

    async fn append_children(&self, _container_id: &NotionId, blocks: &[Block]) -> NotionResult<()> {
        let mut state = self.state.lock().unwrap();
        state.append_sizes.push(blocks.len());
        if state.fail_append_call == Some(state.append_sizes.len()) {
            return Err(injected("append"));
        }
        for block in blocks {
            let remote = state.remote_paragraph(&block.plain_text());
            state.children.push(remote);
        }
        Ok(())
    }

    async fn delete_item(&self, item_id: &str) -> NotionResult<()> {
        let mut state = self.state.lock().unwrap();
        state.deletes += 1;
        if state.fail_delete_call == Some(state.deletes) {
            return Err(injected("delete"));
        }
        state.children.retain(|b| b.id != item_id);
        Ok(())
    }

    async fn query_rows(
        &self,
        _source_id: &NotionId,
        _filter: Option<&Value>,
        cursor: Option<&str>,
        page_size: usize,
    ) -> NotionResult<Page<Value>> {
        let mut state = self.state.lock().unwrap();
        state.fetches += 1;
        Ok(page_of(&state.rows, cursor, page_size))
    }
}
