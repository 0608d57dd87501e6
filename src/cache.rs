use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::model::{YapDataPoint, Yapper};

/// A cache entry with expiration time
pub struct CacheEntry<T> {
    pub data: T,
    pub expires_at: Instant,
}

/// A generic time-based cache with TTL support
pub struct TimedCache<T> {
    entries: RwLock<HashMap<String, CacheEntry<T>>>,
    ttl: Duration,
}

impl<T: Clone + Send + Sync> TimedCache<T> {
    pub fn new(ttl_seconds: u64) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl: Duration::from_secs(ttl_seconds),
        }
    }

    /// Get a value from the cache if it exists and hasn't expired
    pub async fn get(&self, key: &str) -> Option<T> {
        let entries = self.entries.read().await;
        if let Some(entry) = entries.get(key) {
            if Instant::now() < entry.expires_at {
                return Some(entry.data.clone());
            }
        }
        None
    }

    /// Store a value in the cache with the configured TTL
    pub async fn set(&self, key: &str, value: T) {
        let mut entries = self.entries.write().await;
        entries.insert(
            key.to_string(),
            CacheEntry {
                data: value,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }

    /// Remove a specific key from the cache
    pub async fn invalidate(&self, key: &str) {
        let mut entries = self.entries.write().await;
        entries.remove(key);
    }
}

impl<T> std::fmt::Debug for TimedCache<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimedCache")
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// The roster snapshot held by the session. Replaced wholesale on each
/// fetch cycle; `version` lets a slow fetch detect that a newer cycle
/// already landed so it never overwrites fresher data.
#[derive(Debug, Clone, Default)]
pub struct RosterSnapshot {
    pub version: u64,
    pub yappers: Vec<Yapper>,
    pub placeholder: bool,
}

/// Per-endpoint API caches. Yap histories are generated once per
/// yapper per view session and served read-only until the TTL lapses.
#[derive(Debug)]
pub struct ApiCache {
    pub yap_history: TimedCache<Vec<YapDataPoint>>,
}

impl ApiCache {
    pub fn new(ttl_seconds: u64) -> Self {
        Self {
            yap_history: TimedCache::new(ttl_seconds),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_timed_cache_miss_then_hit() {
        let cache: TimedCache<i32> = TimedCache::new(60);
        assert_eq!(cache.get("k").await, None);

        cache.set("k", 7).await;
        assert_eq!(cache.get("k").await, Some(7));
    }

    #[tokio::test]
    async fn test_timed_cache_expiry() {
        let cache: TimedCache<i32> = TimedCache::new(0);
        cache.set("k", 7).await;
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(cache.get("k").await, None);
    }

    #[tokio::test]
    async fn test_timed_cache_invalidate() {
        let cache: TimedCache<i32> = TimedCache::new(60);
        cache.set("k", 7).await;
        cache.invalidate("k").await;
        assert_eq!(cache.get("k").await, None);
    }
}
