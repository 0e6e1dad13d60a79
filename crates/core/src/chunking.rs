//! Fixed-size batching for bulk appends.
//!
//! The remote caps each append at [`MAX_CHUNK_SIZE`] children, so longer documents are sent as
//! consecutive chunks. Chunks go out one at a time, in document order, because the remote
//! appends them in the order it receives them.
//!
//! Nothing is rolled back on failure. Chunks submitted before the failing one stay on the page,
//! and the returned error says how many.

use crate::constants::MAX_CHUNK_SIZE;
use crate::{NotionError, NotionResult};
use std::future::Future;

/// Submits `items` in consecutive chunks of at most `max_chunk_size`, returning the item count.
///
/// # Errors
///
/// - `NotionError::InvalidInput` if `max_chunk_size` is zero or exceeds [`MAX_CHUNK_SIZE`].
/// - `NotionError::PartialAppend` wrapping the first chunk failure, with the number of items and
///   chunks committed before it.
pub async fn submit_in_chunks<'a, T, F, Fut>(
    items: &'a [T],
    max_chunk_size: usize,
    mut submit_chunk: F,
) -> NotionResult<usize>
where
    F: FnMut(&'a [T]) -> Fut,
    Fut: Future<Output = NotionResult<()>>,
{
    if max_chunk_size == 0 || max_chunk_size > MAX_CHUNK_SIZE {
        return Err(NotionError::InvalidInput(format!(
            "chunk size must be between 1 and {}, got {}",
            MAX_CHUNK_SIZE, max_chunk_size
        )));
    }

    let mut added = 0usize;
    for (index, chunk) in items.chunks(max_chunk_size).enumerate() {
        tracing::debug!(chunk = index, size = chunk.len(), "submitting chunk");
        submit_chunk(chunk)
            .await
            .map_err(|source| NotionError::PartialAppend {
                added,
                chunks: index,
                source: Box::new(source),
            })?;
        added += chunk.len();
    }

    Ok(added)
}
