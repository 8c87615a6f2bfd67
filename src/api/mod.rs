pub mod cache;
pub mod client;
pub mod http;

use async_trait::async_trait;
use serde_json::Value;

use crate::app::Result;
use crate::domain::FeedKind;

pub use cache::{QueryCache, QueryKey};
pub use client::HnClient;
pub use http::HttpApi;

pub const DEFAULT_BASE_URL: &str = "https://hacker-news.firebaseio.com/v0";

/// Raw read access to the upstream API.
#[async_trait]
pub trait HnApi {
    /// Ordered story ids for a feed kind; order encodes the source ranking.
    async fn story_ids(&self, kind: FeedKind) -> Result<Vec<u64>>;

    /// A single item, or `None` when the API answers `null`.
    async fn item(&self, id: u64) -> Result<Option<Value>>;
}

#[cfg(test)]
pub(crate) mod mock {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::{json, Value};

    use super::HnApi;
    use crate::app::{HnfeedError, Result};
    use crate::domain::FeedKind;

    /// In-memory API with call counters.
    #[derive(Default)]
    pub struct MockApi {
        pub ids: Mutex<HashMap<FeedKind, Vec<u64>>>,
        pub items: Mutex<HashMap<u64, Value>>,
        pub failing_items: Mutex<Vec<u64>>,
        pub failing_lists: Mutex<Vec<FeedKind>>,
        pub list_calls: AtomicUsize,
        pub item_calls: AtomicUsize,
    }

    impl MockApi {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_ids(self, kind: FeedKind, ids: Vec<u64>) -> Self {
            self.ids.lock().unwrap().insert(kind, ids);
            self
        }

        pub fn with_item(self, id: u64, value: Value) -> Self {
            self.items.lock().unwrap().insert(id, value);
            self
        }

        /// Stories `ids` with the given timestamp each.
        pub fn with_stories(self, ids: impl IntoIterator<Item = u64>, time: i64) -> Self {
            {
                let mut items = self.items.lock().unwrap();
                for id in ids {
                    items.insert(
                        id,
                        json!({"id": id, "title": format!("Story {}", id), "by": "pg", "time": time}),
                    );
                }
            }
            self
        }

        pub fn failing_item(self, id: u64) -> Self {
            self.failing_items.lock().unwrap().push(id);
            self
        }

        pub fn failing_list(self, kind: FeedKind) -> Self {
            self.failing_lists.lock().unwrap().push(kind);
            self
        }

        pub fn list_calls(&self) -> usize {
            self.list_calls.load(Ordering::SeqCst)
        }

        pub fn item_calls(&self) -> usize {
            self.item_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl HnApi for MockApi {
        async fn story_ids(&self, kind: FeedKind) -> Result<Vec<u64>> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            if self.failing_lists.lock().unwrap().contains(&kind) {
                return Err(HnfeedError::Api {
                    status: 500,
                    path: kind.ids_path(),
                });
            }
            Ok(self.ids.lock().unwrap().get(&kind).cloned().unwrap_or_default())
        }

        async fn item(&self, id: u64) -> Result<Option<Value>> {
            self.item_calls.fetch_add(1, Ordering::SeqCst);
            if self.failing_items.lock().unwrap().contains(&id) {
                return Err(HnfeedError::Api {
                    status: 502,
                    path: format!("/item/{}.json", id),
                });
            }
            Ok(self.items.lock().unwrap().get(&id).cloned())
        }
    }
}
