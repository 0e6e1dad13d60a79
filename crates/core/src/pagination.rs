//! Cursor-driven reads and drain-style deletes.
//!
//! Two loops live here:
//!
//! - [`paginate`] follows `next_cursor` forward, collecting items until the remote reports no
//!   more pages or the caller's limit is reached.
//! - [`drain`] repeatedly fetches the *first* page and deletes everything on it until a fetch
//!   comes back empty. Deleting invalidates cursors, so it never follows one.
//!
//! Both loops issue one request at a time and propagate the first failure unchanged, without
//! retrying.

use crate::constants::MAX_PAGE_SIZE;
use crate::{NotionError, NotionResult};
use serde::Deserialize;
use std::future::Future;

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Page<T> {
    #[serde(rename = "results")]
    pub items: Vec<T>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

impl<T> Page<T> {
    /// A final page holding `items`.
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            has_more: false,
            next_cursor: None,
        }
    }

    /// A page followed by another one at `cursor`.
    pub fn with_more(items: Vec<T>, cursor: impl Into<String>) -> Self {
        Self {
            items,
            has_more: true,
            next_cursor: Some(cursor.into()),
        }
    }
}

/// Collects items across pages in arrival order.
///
/// `fetch_page` receives the cursor returned by the previous call (`None` first) and the page
/// size to request. The page size is `MAX_PAGE_SIZE`, or the number of items still needed when
/// that is smaller. With a `limit`, the result is truncated to exactly `limit` items even if the
/// last page overshoots.
pub async fn paginate<T, F, Fut>(mut fetch_page: F, limit: Option<usize>) -> NotionResult<Vec<T>>
where
    F: FnMut(Option<String>, usize) -> Fut,
    Fut: Future<Output = NotionResult<Page<T>>>,
{
    let mut collected = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
        let page_size = match limit {
            Some(limit) if collected.len() >= limit => break,
            Some(limit) => (limit - collected.len()).min(MAX_PAGE_SIZE),
            None => MAX_PAGE_SIZE,
        };

        let page = fetch_page(cursor.take(), page_size).await?;
        tracing::debug!(
            received = page.items.len(),
            has_more = page.has_more,
            "fetched page"
        );
        collected.extend(page.items);

        if !page.has_more {
            break;
        }
        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => {
                tracing::warn!("remote reported more results without a cursor; stopping");
                break;
            }
        }
    }

    if let Some(limit) = limit {
        collected.truncate(limit);
    }
    Ok(collected)
}

/// Deletes everything a listing returns until it comes back empty.
///
/// `fetch_first` is always asked for the first page; `delete` is called once per item in page
/// order. Returns the number of items deleted.
///
/// # Errors
///
/// Any failure stops the loop and is returned as `NotionError::PartialClear` carrying the number
/// of items already deleted.
pub async fn drain<T, F, FFut, D, DFut>(mut fetch_first: F, mut delete: D) -> NotionResult<usize>
where
    F: FnMut() -> FFut,
    FFut: Future<Output = NotionResult<Page<T>>>,
    D: FnMut(T) -> DFut,
    DFut: Future<Output = NotionResult<()>>,
{
    let mut deleted = 0usize;

    loop {
        let page = fetch_first().await.map_err(|source| NotionError::PartialClear {
            deleted,
            source: Box::new(source),
        })?;
        if page.items.is_empty() {
            break;
        }

        tracing::debug!(count = page.items.len(), "deleting page of items");
        for item in page.items {
            delete(item).await.map_err(|source| NotionError::PartialClear {
                deleted,
                source: Box::new(source),
            })?;
            deleted += 1;
        }
    }

    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn numbered_pages(total: usize, per_page: usize) -> impl Fn(Option<String>) -> Page<usize> {
        move |cursor| {
            let start: usize = cursor.map(|c| c.parse().unwrap()).unwrap_or(0);
            let end = (start + per_page).min(total);
            let items: Vec<usize> = (start..end).collect();
            if end < total {
                Page::with_more(items, end.to_string())
            } else {
                Page::last(items)
            }
        }
    }

    #[tokio::test]
    async fn test_paginate_collects_all_pages_in_order() {
        let source = numbered_pages(250, 100);
        let calls = RefCell::new(Vec::new());

        let items = paginate(
            |cursor, size| {
                calls.borrow_mut().push((cursor.clone(), size));
                let page = source(cursor);
                async move { Ok(page) }
            },
            None,
        )
        .await
        .unwrap();

        assert_eq!(items, (0..250).collect::<Vec<_>>());
        assert_eq!(
            calls.into_inner(),
            vec![
                (None, 100),
                (Some("100".to_string()), 100),
                (Some("200".to_string()), 100)
            ]
        );
    }

    #[tokio::test]
    async fn test_paginate_limit_truncates_and_shrinks_last_request() {
        let calls = RefCell::new(Vec::new());

        // Remote ignores the requested size and always returns 100 items.
        let items = paginate(
            |cursor: Option<String>, size| {
                calls.borrow_mut().push(size);
                let start: usize = cursor.map(|c| c.parse().unwrap()).unwrap_or(0);
                let page = Page::with_more((start..start + 100).collect(), (start + 100).to_string());
                async move { Ok(page) }
            },
            Some(150),
        )
        .await
        .unwrap();

        assert_eq!(items.len(), 150);
        assert_eq!(items, (0..150).collect::<Vec<_>>());
        assert_eq!(calls.into_inner(), vec![100, 50]);
    }

    #[tokio::test]
    async fn test_paginate_zero_limit_fetches_nothing() {
        let mut calls = 0;
        let items: Vec<usize> = paginate(
            |_, _| {
                calls += 1;
                async { Ok(Page::last(vec![1])) }
            },
            Some(0),
        )
        .await
        .unwrap();
        assert!(items.is_empty());
        assert_eq!(calls, 0);
    }

    #[tokio::test]
    async fn test_paginate_stops_when_cursor_missing() {
        let mut calls = 0;
        let items = paginate(
            |_, _| {
                calls += 1;
                async {
                    Ok(Page {
                        items: vec![1, 2],
                        has_more: true,
                        next_cursor: None,
                    })
                }
            },
            None,
        )
        .await
        .unwrap();
        assert_eq!(items, vec![1, 2]);
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn test_paginate_propagates_first_failure() {
        let mut calls = 0;
        let result: NotionResult<Vec<usize>> = paginate(
            |_, _| {
                calls += 1;
                let n = calls;
                async move {
                    if n == 1 {
                        Ok(Page::with_more(vec![1], "next"))
                    } else {
                        Err(NotionError::InvalidInput("boom".into()))
                    }
                }
            },
            None,
        )
        .await;
        assert!(matches!(result, Err(NotionError::InvalidInput(_))));
        assert_eq!(calls, 2);
    }

    #[tokio::test]
    async fn test_drain_deletes_until_empty() {
        let remaining = RefCell::new((0..130).collect::<Vec<usize>>());
        let fetches = RefCell::new(0);

        let deleted = drain(
            || {
                *fetches.borrow_mut() += 1;
                let items: Vec<usize> = remaining.borrow().iter().take(100).copied().collect();
                async move { Ok(Page::last(items)) }
            },
            |item| {
                remaining.borrow_mut().retain(|x| *x != item);
                async { Ok(()) }
            },
        )
        .await
        .unwrap();

        assert_eq!(deleted, 130);
        assert!(remaining.borrow().is_empty());
        assert_eq!(*fetches.borrow(), 3);
    }

    #[tokio::test]
    async fn test_drain_reports_deleted_count_on_failure() {
        let result = drain(
            || async { Ok(Page::last(vec![1, 2, 3])) },
            |item| async move {
                if item == 3 {
                    Err(NotionError::InvalidInput("gone".into()))
                } else {
                    Ok(())
                }
            },
        )
        .await;

        match result {
            Err(NotionError::PartialClear { deleted, .. }) => assert_eq!(deleted, 2),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
