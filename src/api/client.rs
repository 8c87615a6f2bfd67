use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use serde_json::Value;
use tracing::debug;

use crate::api::cache::{QueryCache, QueryKey};
use crate::api::HnApi;
use crate::app::Result;
use crate::config::CacheConfig;
use crate::domain::{Comment, FeedKind, Story};

/// Cached access to the upstream API, shared by every view.
///
/// Each query family has its own staleness window taken from [`CacheConfig`];
/// all of them share the idle eviction window.
pub struct HnClient {
    api: Arc<dyn HnApi + Send + Sync>,
    ids: QueryCache<Arc<Vec<u64>>>,
    items: QueryCache<Option<Value>>,
    comments: QueryCache<Vec<Comment>>,
    picks: QueryCache<Vec<Story>>,
}

impl HnClient {
    pub fn new(api: Arc<dyn HnApi + Send + Sync>, cache: &CacheConfig) -> Self {
        let gc = Duration::from_secs(cache.gc_secs);
        Self {
            api,
            ids: QueryCache::new(Duration::from_secs(cache.story_ids_secs), gc),
            items: QueryCache::new(Duration::from_secs(cache.item_secs), gc),
            comments: QueryCache::new(Duration::from_secs(cache.comments_secs), gc),
            picks: QueryCache::new(Duration::from_secs(cache.best_picks_secs), gc),
        }
    }

    pub async fn story_ids(&self, kind: FeedKind) -> Result<Arc<Vec<u64>>> {
        self.ids
            .get_or_fetch(QueryKey::StoryIds(kind), || async {
                let ids = self.api.story_ids(kind).await?;
                debug!("fetched {} {} story ids", ids.len(), kind);
                Ok(Arc::new(ids))
            })
            .await
    }

    pub async fn item(&self, id: u64) -> Result<Option<Value>> {
        self.items
            .get_or_fetch(QueryKey::Item(id), || self.api.item(id))
            .await
    }

    /// A story, or `None` for anything that does not validate as one.
    pub async fn story(&self, id: u64) -> Result<Option<Story>> {
        Ok(self.item(id).await?.and_then(Story::from_json))
    }

    /// Resolve ids concurrently, keeping list order.
    ///
    /// Failed fetches are dropped exactly like deleted or malformed items;
    /// the upstream API returns sporadic nulls and a page should not fail
    /// because of one of them.
    pub async fn resolve_stories(&self, ids: &[u64]) -> Vec<Story> {
        let results = join_all(ids.iter().map(|&id| self.story(id))).await;

        ids.iter()
            .zip(results)
            .filter_map(|(id, result)| match result {
                Ok(story) => story,
                Err(e) => {
                    debug!("dropping item {}: {}", id, e);
                    None
                }
            })
            .collect()
    }

    /// The first `limit` validated stories of a feed.
    pub async fn stories(&self, kind: FeedKind, limit: usize) -> Result<Vec<Story>> {
        let ids = self.story_ids(kind).await?;
        let end = limit.min(ids.len());
        Ok(self.resolve_stories(&ids[..end]).await)
    }

    /// Immediate children of a story, capped at `limit`. Replies are not followed.
    pub async fn top_level_comments(&self, story_id: u64, limit: usize) -> Result<Vec<Comment>> {
        let key = QueryKey::Comments { story_id, limit };
        self.comments
            .get_or_fetch(key, || async {
                let kids = match self.item(story_id).await? {
                    Some(value) => Story::from_json(value).map(|s| s.kids).unwrap_or_default(),
                    None => Vec::new(),
                };
                let slice = &kids[..limit.min(kids.len())];

                let results = join_all(slice.iter().map(|&id| self.item(id))).await;
                let comments = slice
                    .iter()
                    .zip(results)
                    .filter_map(|(id, result)| match result {
                        Ok(value) => value.and_then(Comment::from_json),
                        Err(e) => {
                            debug!("dropping comment {}: {}", id, e);
                            None
                        }
                    })
                    .collect::<Vec<_>>();

                debug!(
                    "story {}: {} of {} comments usable",
                    story_id,
                    comments.len(),
                    slice.len()
                );
                Ok(comments)
            })
            .await
    }

    /// Curated picks: the head of the `best` feed.
    pub async fn best_picks(&self, count: usize) -> Result<Vec<Story>> {
        self.picks
            .get_or_fetch(QueryKey::BestPicks(count), || self.stories(FeedKind::Best, count))
            .await
    }

    /// Forget everything; the next query of any kind goes to the network.
    pub fn invalidate_all(&self) {
        self.ids.invalidate_all();
        self.items.invalidate_all();
        self.comments.invalidate_all();
        self.picks.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockApi;
    use serde_json::json;

    fn client(api: MockApi) -> (Arc<MockApi>, HnClient) {
        let api = Arc::new(api);
        let client = HnClient::new(api.clone(), &CacheConfig::default());
        (api, client)
    }

    #[tokio::test]
    async fn test_story_ids_cached_per_kind() {
        let (api, client) = client(
            MockApi::new()
                .with_ids(FeedKind::Top, vec![1, 2])
                .with_ids(FeedKind::New, vec![3]),
        );

        assert_eq!(*client.story_ids(FeedKind::Top).await.unwrap(), vec![1, 2]);
        assert_eq!(*client.story_ids(FeedKind::Top).await.unwrap(), vec![1, 2]);
        assert_eq!(*client.story_ids(FeedKind::New).await.unwrap(), vec![3]);
        assert_eq!(api.list_calls(), 2);
    }

    #[tokio::test]
    async fn test_resolve_drops_invalid_and_failed_items_in_order() {
        let (_, client) = client(
            MockApi::new()
                .with_stories([1, 2, 4], 100)
                .with_item(3, json!({"id": 3, "type": "comment", "text": "x"}))
                .with_stories([5], 100)
                .failing_item(5),
        );

        let stories = client.resolve_stories(&[4, 3, 2, 5, 6, 1]).await;
        let ids: Vec<u64> = stories.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![4, 2, 1]);
    }

    #[tokio::test]
    async fn test_stories_respects_limit() {
        let (_, client) = client(
            MockApi::new()
                .with_ids(FeedKind::Best, (1..=10).collect())
                .with_stories(1..=10, 100),
        );
        let stories = client.stories(FeedKind::Best, 5).await.unwrap();
        assert_eq!(stories.len(), 5);
        assert_eq!(stories[0].id, 1);
    }

    #[tokio::test]
    async fn test_top_level_comments_capped_and_filtered() {
        let kids: Vec<u64> = (100..130).collect();
        let mut api = MockApi::new().with_item(
            1,
            json!({"id": 1, "title": "Story", "kids": kids}),
        );
        for id in 100..130 {
            api = api.with_item(id, json!({"id": id, "by": "a", "text": "hello"}));
        }
        let api = api
            .with_item(101, json!({"id": 101, "deleted": true}))
            .failing_item(102);
        let (_, client) = client(api);

        let comments = client.top_level_comments(1, 20).await.unwrap();
        assert_eq!(comments.len(), 18);
        assert_eq!(comments[0].id, 100);
        assert_eq!(comments[1].id, 103);
    }

    #[tokio::test]
    async fn test_comments_for_story_without_kids_is_empty() {
        let (_, client) = client(MockApi::new().with_stories([9], 100));
        assert!(client.top_level_comments(9, 20).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_comment_story_fetch_failure_is_error() {
        let (_, client) = client(MockApi::new().failing_item(9));
        assert!(client.top_level_comments(9, 20).await.is_err());
    }

    #[tokio::test]
    async fn test_best_picks_uses_best_feed() {
        let (_, client) = client(
            MockApi::new()
                .with_ids(FeedKind::Best, vec![7, 8, 9, 10, 11, 12])
                .with_stories(7..=12, 100),
        );
        let picks = client.best_picks(5).await.unwrap();
        let ids: Vec<u64> = picks.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![7, 8, 9, 10, 11]);
    }

    #[tokio::test]
    async fn test_invalidate_all_refetches_lists() {
        let (api, client) = client(MockApi::new().with_ids(FeedKind::Ask, vec![1]));
        client.story_ids(FeedKind::Ask).await.unwrap();
        client.invalidate_all();
        client.story_ids(FeedKind::Ask).await.unwrap();
        assert_eq!(api.list_calls(), 2);
    }

    #[tokio::test]
    async fn test_idle_items_evicted_after_gc_window() {
        let api = Arc::new(MockApi::new().with_stories(1..=2, 100));
        let cache = CacheConfig {
            gc_secs: 0,
            ..CacheConfig::default()
        };
        let client = HnClient::new(api.clone(), &cache);

        client.story(1).await.unwrap();
        client.story(2).await.unwrap();
        client.story(1).await.unwrap();
        assert_eq!(api.item_calls(), 3);
    }
}
