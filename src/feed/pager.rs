//! Forward-only paged access to a feed.
//!
//! The id list of a feed kind is fetched once, on the first request. Later
//! requests carry that list along so that only the window's items are
//! resolved.

use std::sync::Arc;

use tracing::debug;

use crate::api::HnClient;
use crate::domain::{FeedKind, Story};

#[derive(Debug, Clone, PartialEq)]
pub struct FeedPage {
    /// Validated stories in list order; may be shorter than the window.
    pub stories: Vec<Story>,
    /// Where the following window starts, or `None` when this was the last.
    pub next_offset: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct PageRequest {
    pub generation: u64,
    pub kind: FeedKind,
    pub offset: usize,
    pub page_size: usize,
    /// Already fetched id list; `None` on the first request.
    pub ids: Option<Arc<Vec<u64>>>,
    /// Issued by the date lookahead rather than by the user.
    pub lookahead: bool,
}

#[derive(Debug, Clone)]
pub struct PageLoad {
    pub ids: Arc<Vec<u64>>,
    pub page: FeedPage,
}

#[derive(Debug, Clone)]
pub struct PageResponse {
    pub generation: u64,
    pub kind: FeedKind,
    pub lookahead: bool,
    pub result: Result<PageLoad, String>,
}

/// Run a page request to completion.
///
/// Only a failed id-list fetch is an error; item failures shrink the page.
pub async fn execute(client: &HnClient, request: PageRequest) -> PageResponse {
    let PageRequest {
        generation,
        kind,
        offset,
        page_size,
        ids,
        lookahead,
    } = request;

    let ids = match ids {
        Some(ids) => Ok(ids),
        None => client.story_ids(kind).await.map_err(|e| e.to_string()),
    };

    let result = match ids {
        Ok(ids) => {
            let page = load_page(client, &ids, offset, page_size).await;
            Ok(PageLoad { ids, page })
        }
        Err(e) => Err(e),
    };

    PageResponse {
        generation,
        kind,
        lookahead,
        result,
    }
}

/// Resolve the window `ids[offset..offset + page_size]`.
pub async fn load_page(client: &HnClient, ids: &[u64], offset: usize, page_size: usize) -> FeedPage {
    let start = offset.min(ids.len());
    let end = offset.saturating_add(page_size).min(ids.len());
    let stories = client.resolve_stories(&ids[start..end]).await;

    let next = offset.saturating_add(page_size);
    let next_offset = (next < ids.len()).then_some(next);

    debug!(
        "page at {}: {} of {} items valid, next {:?}",
        offset,
        stories.len(),
        end - start,
        next_offset
    );

    FeedPage {
        stories,
        next_offset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockApi;
    use crate::config::CacheConfig;
    use serde_json::json;

    fn forty_five_stories() -> Arc<MockApi> {
        Arc::new(
            MockApi::new()
                .with_ids(FeedKind::Top, (1..=45).collect())
                .with_stories(1..=45, 1_700_000_000)
                .with_item(3, serde_json::Value::Null)
                .with_item(7, json!({"id": 7, "by": "x", "time": 1_700_000_000})),
        )
    }

    fn request(offset: usize, ids: Option<Arc<Vec<u64>>>) -> PageRequest {
        PageRequest {
            generation: 1,
            kind: FeedKind::Top,
            offset,
            page_size: 20,
            ids,
            lookahead: false,
        }
    }

    #[tokio::test]
    async fn test_pages_over_forty_five_ids() {
        let api = forty_five_stories();
        let client = HnClient::new(api.clone(), &CacheConfig::default());

        let first = execute(&client, request(0, None)).await;
        let load = first.result.unwrap();
        assert_eq!(load.page.stories.len(), 18);
        assert_eq!(load.page.next_offset, Some(20));

        let second = execute(&client, request(20, Some(load.ids.clone()))).await;
        let second = second.result.unwrap().page;
        assert_eq!(second.stories.len(), 20);
        assert_eq!(second.next_offset, Some(40));

        let third = execute(&client, request(40, Some(load.ids.clone()))).await;
        let third = third.result.unwrap().page;
        assert_eq!(third.stories.len(), 5);
        assert_eq!(third.next_offset, None);

        // The list was fetched once for all three pages.
        assert_eq!(api.list_calls(), 1);
    }

    #[tokio::test]
    async fn test_concatenated_pages_keep_list_order() {
        let ids: Vec<u64> = vec![50, 10, 40, 20, 30, 60, 5];
        let api = Arc::new(
            MockApi::new()
                .with_ids(FeedKind::New, ids.clone())
                .with_stories(ids.clone(), 1),
        );
        let client = HnClient::new(api, &CacheConfig::default());
        let ids = Arc::new(ids);

        let mut seen = Vec::new();
        let mut offset = Some(0);
        while let Some(at) = offset {
            let page = load_page(&client, &ids, at, 3).await;
            seen.extend(page.stories.iter().map(|s| s.id));
            offset = page.next_offset;
        }
        assert_eq!(seen, *ids);
    }

    #[tokio::test]
    async fn test_list_failure_fails_request() {
        let api = Arc::new(MockApi::new().failing_list(FeedKind::Top));
        let client = HnClient::new(api.clone(), &CacheConfig::default());

        let response = execute(&client, request(0, None)).await;
        assert!(response.result.is_err());
        assert_eq!(api.item_calls(), 0);
    }

    #[tokio::test]
    async fn test_item_failure_is_dropped_like_invalid() {
        let api = Arc::new(
            MockApi::new()
                .with_ids(FeedKind::Top, vec![1, 2, 3])
                .with_stories([1, 2, 3], 1)
                .failing_item(2),
        );
        let client = HnClient::new(api, &CacheConfig::default());

        let load = execute(&client, request(0, None)).await.result.unwrap();
        let ids: Vec<u64> = load.page.stories.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(load.page.next_offset, None);
    }

    #[tokio::test]
    async fn test_empty_list_yields_empty_last_page() {
        let api = Arc::new(MockApi::new().with_ids(FeedKind::Ask, Vec::new()));
        let client = HnClient::new(api, &CacheConfig::default());

        let page = load_page(&client, &[], 0, 20).await;
        assert!(page.stories.is_empty());
        assert_eq!(page.next_offset, None);
    }
}
