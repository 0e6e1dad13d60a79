//! Page content operations: append, clear, replace, read, and database queries.
//!
//! These are the entry points the command line calls. Each takes the store explicitly, holds no
//! state between calls, and performs its remote requests strictly one after another.
//!
//! Replace is two phases with no transaction around them: clear everything, then append. If the
//! append fails after the clear succeeded, the page is left with only the chunks that made it.
//! The returned error carries both counts so the page can be checked and repaired by hand.

use crate::blocks::Block;
use crate::chunking::submit_in_chunks;
use crate::constants::{MAX_CHUNK_SIZE, MAX_PAGE_SIZE};
use crate::error::ReplacePhase;
use crate::pagination::{drain, paginate};
use crate::store::{BlockStore, RemoteBlock};
use crate::{NotionError, NotionResult};
use ntn_types::NotionId;
use serde_json::Value;
use std::future::Future;

/// Counts reported by a completed replace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReplaceOutcome {
    pub deleted: usize,
    pub added: usize,
}

/// Runs `clear` to completion, then `append` with `items`.
///
/// `clear` runs exactly once and is never retried.
///
/// # Errors
///
/// Returns `NotionError::Replace` naming the failed phase, the number of items deleted, and the
/// number appended before the failure.
pub async fn replace_content<'a, T, C, CFut, A, AFut>(
    clear: C,
    append: A,
    items: &'a [T],
) -> NotionResult<ReplaceOutcome>
where
    C: FnOnce() -> CFut,
    CFut: Future<Output = NotionResult<usize>>,
    A: FnOnce(&'a [T]) -> AFut,
    AFut: Future<Output = NotionResult<usize>>,
{
    let deleted = clear().await.map_err(|source| NotionError::Replace {
        phase: ReplacePhase::Clear,
        deleted: source.deleted_before_failure().unwrap_or(0),
        added: 0,
        source: Box::new(source),
    })?;

    let added = append(items).await.map_err(|source| NotionError::Replace {
        phase: ReplacePhase::Append,
        deleted,
        added: source.added_before_failure().unwrap_or(0),
        source: Box::new(source),
    })?;

    Ok(ReplaceOutcome { deleted, added })
}

async fn append_blocks<S>(store: &S, page_id: &NotionId, blocks: &[Block]) -> NotionResult<usize>
where
    S: BlockStore + ?Sized,
{
    submit_in_chunks(blocks, MAX_CHUNK_SIZE, |chunk| {
        store.append_children(page_id, chunk)
    })
    .await
}

async fn clear_blocks<S>(store: &S, page_id: &NotionId) -> NotionResult<usize>
where
    S: BlockStore + ?Sized,
{
    drain(
        || store.fetch_children_page(page_id, None, MAX_PAGE_SIZE),
        |block: RemoteBlock| async move { store.delete_item(&block.id).await },
    )
    .await
}

/// Appends `blocks` to the end of a page in chunks, returning how many were added.
pub async fn append_page_content<S>(
    store: &S,
    page_id: &NotionId,
    blocks: &[Block],
) -> NotionResult<usize>
where
    S: BlockStore + ?Sized,
{
    let added = append_blocks(store, page_id, blocks)
        .await
        .map_err(|e| e.on_page(*page_id, "append"))?;
    tracing::info!(page = %page_id, added, "appended page content");
    Ok(added)
}

/// Deletes every child block of a page, returning how many were deleted.
pub async fn clear_page_content<S>(store: &S, page_id: &NotionId) -> NotionResult<usize>
where
    S: BlockStore + ?Sized,
{
    let deleted = clear_blocks(store, page_id)
        .await
        .map_err(|e| e.on_page(*page_id, "clear"))?;
    tracing::info!(page = %page_id, deleted, "cleared page content");
    Ok(deleted)
}

/// Replaces a page's content with `blocks`: clear, then append.
pub async fn replace_page_content<S>(
    store: &S,
    page_id: &NotionId,
    blocks: &[Block],
) -> NotionResult<ReplaceOutcome>
where
    S: BlockStore + ?Sized,
{
    let outcome = replace_content(
        || clear_blocks(store, page_id),
        |items| append_blocks(store, page_id, items),
        blocks,
    )
    .await
    .map_err(|e| e.on_page(*page_id, "replace"))?;
    tracing::info!(
        page = %page_id,
        deleted = outcome.deleted,
        added = outcome.added,
        "replaced page content"
    );
    Ok(outcome)
}

/// Reads a page's child blocks across all pages, up to `limit` if given.
pub async fn get_page_content<S>(
    store: &S,
    page_id: &NotionId,
    limit: Option<usize>,
) -> NotionResult<Vec<RemoteBlock>>
where
    S: BlockStore + ?Sized,
{
    paginate(
        |cursor, page_size| async move {
            store
                .fetch_children_page(page_id, cursor.as_deref(), page_size)
                .await
        },
        limit,
    )
    .await
    .map_err(|e| e.on_page(*page_id, "read"))
}

/// Queries a database's rows across pages, up to `limit` if given.
pub async fn query_database<S>(
    store: &S,
    source_id: &NotionId,
    filter: Option<&Value>,
    limit: Option<usize>,
) -> NotionResult<Vec<Value>>
where
    S: BlockStore + ?Sized,
{
    let rows = paginate(
        |cursor, page_size| async move {
            store
                .query_rows(source_id, filter, cursor.as_deref(), page_size)
                .await
        },
        limit,
    )
    .await?;
    tracing::info!(database = %source_id, rows = rows.len(), "queried database");
    Ok(rows)
}
