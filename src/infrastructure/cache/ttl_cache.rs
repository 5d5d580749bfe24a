//! Process-wide, best-effort TTL cache (C3). Backed by a `DashMap` keyed by
//! cache key, each entry carrying its own expiry instant; a miss just falls
//! through to the caller's recompute path.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;

use crate::application::ports::Cache;

struct Entry {
    value: String,
    expires_at: Instant,
}

pub struct TtlCache {
    entries: DashMap<String, Entry>,
}

impl TtlCache {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }
}

impl Default for TtlCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Cache for TtlCache {
    async fn get(&self, key: &str) -> Option<String> {
        let hit = self.entries.get(key)?;
        if hit.expires_at < Instant::now() {
            drop(hit);
            self.entries.remove(key);
            return None;
        }
        Some(hit.value.clone())
    }

    async fn set(&self, key: String, value: String, ttl: Duration) {
        self.entries.insert(
            key,
            Entry {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
    }

    async fn invalidate(&self, key: &str) {
        self.entries.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn expired_entries_are_not_returned() {
        let cache = TtlCache::new();
        cache
            .set("k".into(), "v".into(), Duration::from_millis(1))
            .await;
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert_eq!(cache.get("k").await, None);
    }

    #[tokio::test]
    async fn fresh_entries_are_returned() {
        let cache = TtlCache::new();
        cache.set("k".into(), "v".into(), Duration::from_secs(60)).await;
        assert_eq!(cache.get("k").await, Some("v".to_string()));
    }
}
