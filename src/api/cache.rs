//! Request cache with per-key deduplication and a staleness window.
//!
//! Each key owns an async slot. A caller holds the slot while it fetches, so
//! concurrent callers for the same key wait and then read the fresh value
//! instead of issuing a second request. Values older than `stale_after` are
//! refetched; if that refetch fails the stale value is served instead.
//!
//! Entries nobody has read for `gc_after` are swept when a new key is added.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::app::Result;
use crate::domain::FeedKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    StoryIds(FeedKind),
    Item(u64),
    Comments { story_id: u64, limit: usize },
    BestPicks(usize),
}

struct Entry<V> {
    value: V,
    fetched_at: Instant,
    used_at: Instant,
}

type Slot<V> = Arc<tokio::sync::Mutex<Option<Entry<V>>>>;

struct Slots<V> {
    map: HashMap<QueryKey, Slot<V>>,
    swept_at: Instant,
}

pub struct QueryCache<V> {
    stale_after: Duration,
    gc_after: Duration,
    slots: Mutex<Slots<V>>,
}

impl<V: Clone> QueryCache<V> {
    pub fn new(stale_after: Duration, gc_after: Duration) -> Self {
        Self {
            stale_after,
            gc_after,
            slots: Mutex::new(Slots {
                map: HashMap::new(),
                swept_at: Instant::now(),
            }),
        }
    }

    pub async fn get_or_fetch<F, Fut>(&self, key: QueryKey, fetch: F) -> Result<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>>,
    {
        let slot = self.slot(key);
        let mut entry = slot.lock().await;

        if let Some(cached) = entry.as_mut() {
            cached.used_at = Instant::now();
            if cached.fetched_at.elapsed() < self.stale_after {
                debug!("cache hit for {:?}", key);
                return Ok(cached.value.clone());
            }
        }

        match fetch().await {
            Ok(value) => {
                let now = Instant::now();
                *entry = Some(Entry {
                    value: value.clone(),
                    fetched_at: now,
                    used_at: now,
                });
                Ok(value)
            }
            Err(e) => match entry.as_ref() {
                Some(stale) => {
                    warn!("refetch of {:?} failed, serving stale value: {}", key, e);
                    Ok(stale.value.clone())
                }
                None => Err(e),
            },
        }
    }

    /// Drop every cached value; in-flight fetches finish into orphaned slots.
    pub fn invalidate_all(&self) {
        self.lock_slots().map.clear();
    }

    pub fn invalidate(&self, key: QueryKey) {
        self.lock_slots().map.remove(&key);
    }

    pub fn len(&self) -> usize {
        self.lock_slots().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, key: QueryKey) -> Slot<V> {
        let mut slots = self.lock_slots();
        if !slots.map.contains_key(&key) && slots.swept_at.elapsed() >= self.gc_after {
            self.sweep(&mut slots);
        }
        slots.map.entry(key).or_default().clone()
    }

    /// Remove idle slots: not shared with a caller, not locked, and either
    /// empty or unread for `gc_after`.
    fn sweep(&self, slots: &mut Slots<V>) {
        let before = slots.map.len();
        slots.map.retain(|_, slot| {
            if Arc::strong_count(slot) > 1 {
                return true;
            }
            match slot.try_lock() {
                Ok(entry) => entry
                    .as_ref()
                    .is_some_and(|e| e.used_at.elapsed() < self.gc_after),
                Err(_) => true,
            }
        });
        slots.swept_at = Instant::now();

        let evicted = before - slots.map.len();
        if evicted > 0 {
            debug!("evicted {} idle cache entries", evicted);
        }
    }

    fn lock_slots(&self) -> std::sync::MutexGuard<'_, Slots<V>> {
        self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
