//! Walking paged listings.
//!
//! List endpoints return one [`Page`] at a time. Views that act on every
//! record (stats, lifecycle checks, "am I already enrolled") need them all,
//! so they fetch page 0 and then every further page the backend reports.

use crate::error::Result;
use crate::requests::PageRequest;
use eventos_core::types::Page;
use std::future::Future;

/// Fetch every page of a listing, `size` items per request.
///
/// The result holds all items in backend order, with `total_elements` and
/// `total_pages` as reported by the first page. Stops early when a page comes
/// back empty, which happens when records are deleted between requests.
///
/// # Errors
///
/// The first failing request's error; items fetched before it are dropped.
///
/// # Example
///
/// ```
/// use eventos_client::paging::collect_pages;
/// use eventos_core::types::Page;
///
/// # tokio_test::block_on(async {
/// let items: Vec<u32> = (0..25).collect();
/// let all = collect_pages(10, |page| {
///     let items = items.clone();
///     async move { Ok(Page::from_items(items, page.page, page.size)) }
/// })
/// .await
/// .unwrap();
///
/// assert_eq!(all.content.len(), 25);
/// # });
/// ```
pub async fn collect_pages<T, F, Fut>(size: u32, mut fetch: F) -> Result<Page<T>>
where
    F: FnMut(PageRequest) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let mut all = fetch(PageRequest::first(size)).await?;

    let mut number = 1;
    while number < all.total_pages {
        let next = fetch(PageRequest { page: number, size }).await?;
        if next.is_empty() {
            tracing::debug!(page = number, total_pages = all.total_pages, "Listing ended early");
            break;
        }
        all.content.extend(next.content);
        number += 1;
    }

    if number > 1 {
        tracing::debug!(pages = number, items = all.content.len(), "Collected paged listing");
    }
    all.number = 0;
    Ok(all)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code
mod tests {
    use super::*;
    use crate::error::ApiError;
    use std::sync::Mutex;

    #[tokio::test]
    async fn single_page_is_one_request() {
        let requests = Mutex::new(Vec::new());

        let all = collect_pages(10, |page| {
            requests.lock().unwrap().push(page.page);
            async move { Ok(Page::from_items(vec!["a", "b"], page.page, page.size)) }
        })
        .await
        .unwrap();

        assert_eq!(all.content, vec!["a", "b"]);
        assert_eq!(*requests.lock().unwrap(), vec![0]);
    }

    #[tokio::test]
    async fn follows_every_reported_page() {
        let items: Vec<u32> = (0..23).collect();
        let requests = Mutex::new(Vec::new());

        let all = collect_pages(10, |page| {
            requests.lock().unwrap().push(page.page);
            let items = items.clone();
            async move { Ok(Page::from_items(items, page.page, page.size)) }
        })
        .await
        .unwrap();

        assert_eq!(all.content, items);
        assert_eq!(all.total_elements, 23);
        assert_eq!(all.total_pages, 3);
        assert_eq!(*requests.lock().unwrap(), vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn listing_that_shrinks_stops_at_the_empty_page() {
        let all = collect_pages(2, |page| async move {
            // Reports 3 pages, but only the first still has items
            let content = if page.page == 0 { vec![1, 2] } else { Vec::new() };
            Ok(Page {
                content,
                total_pages: 3,
                total_elements: 6,
                size: page.size,
                number: page.page,
            })
        })
        .await
        .unwrap();

        assert_eq!(all.content, vec![1, 2]);
    }

    #[tokio::test]
    async fn failure_on_a_later_page_fails_the_listing() {
        let result = collect_pages(1, |page| async move {
            if page.page == 1 {
                Err(ApiError::Transport("connection reset".to_string()))
            } else {
                Ok(Page::from_items(vec![1, 2, 3], page.page, page.size))
            }
        })
        .await;

        assert!(result.is_err());
    }
}
