//! TTL cache keyed by arbitrary hashable keys

use std::{collections::HashMap, hash::Hash, sync::Arc, time::Duration};

use tokio::{sync::RwLock, task::JoinHandle, time::Instant};
use tracing::debug;

use crate::{
    error::{CacheError, Result},
    metrics::{CacheMetrics, CacheStats},
};

/// Stored value with its bookkeeping timestamps
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The cached value
    pub value: V,
    /// When the entry was stored
    pub inserted_at: Instant,
    /// When the entry stops being served
    pub expires_at: Instant,
}

impl<V> CacheEntry<V> {
    /// Create an entry that expires `ttl` after `now`
    pub fn new(value: V, now: Instant, ttl: Duration) -> Self {
        Self {
            value,
            inserted_at: now,
            expires_at: now + ttl,
        }
    }

    /// Whether the entry's age has reached its TTL at `now`
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    /// Remaining lifetime, zero once expired
    pub fn ttl_remaining(&self, now: Instant) -> Duration {
        self.expires_at.saturating_duration_since(now)
    }
}

/// In-memory cache where every entry lives for a fixed TTL.
///
/// Expiry is decided on read from the stored timestamp; purging and the optional
/// sweeper only reclaim memory.
pub struct TtlCache<K, V> {
    entries: RwLock<HashMap<K, CacheEntry<V>>>,
    ttl: Duration,
    metrics: CacheMetrics,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + std::fmt::Debug + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Create a cache with the given TTL
    pub fn new(ttl: Duration) -> Result<Self> {
        if ttl.is_zero() {
            return Err(CacheError::InvalidTtl {
                reason: "ttl must be greater than zero".to_string(),
            });
        }
        Ok(Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            metrics: CacheMetrics::new(),
        })
    }

    /// Configured TTL
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return a live value, dropping it if it has expired
    pub async fn get(&self, key: &K) -> Option<V> {
        let now = Instant::now();
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if !entry.is_expired_at(now) => {
                    self.metrics.record_hit();
                    debug!("Cache hit for {:?}", key);
                    return Some(entry.value.clone());
                }
                Some(_) => {}
                None => {
                    self.metrics.record_miss();
                    return None;
                }
            }
        }

        let mut entries = self.entries.write().await;
        if entries
            .get(key)
            .is_some_and(|entry| entry.is_expired_at(now))
        {
            entries.remove(key);
            self.metrics.record_evictions(1);
            debug!("Evicted expired cache entry {:?}", key);
        }
        self.metrics.record_miss();
        None
    }

    /// Store a value, replacing any previous entry and restarting its TTL
    pub async fn insert(&self, key: K, value: V) {
        let entry = CacheEntry::new(value, Instant::now(), self.ttl);
        let mut entries = self.entries.write().await;
        entries.insert(key, entry);
        self.metrics.record_insertion();
    }

    /// Remove an entry regardless of age
    pub async fn remove(&self, key: &K) -> bool {
        self.entries.write().await.remove(key).is_some()
    }

    /// Drop every entry
    pub async fn clear(&self) {
        self.entries.write().await.clear();
        debug!("Cache cleared");
    }

    /// Drop every expired entry and return how many were removed
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired_at(now));
        let removed = before - entries.len();
        if removed > 0 {
            self.metrics.record_evictions(removed as u64);
            debug!("Purged {} expired cache entries", removed);
        }
        removed
    }

    /// Number of stored entries, including ones not yet purged
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether nothing is stored
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Counter snapshot
    pub async fn stats(&self) -> CacheStats {
        let len = self.len().await;
        self.metrics.snapshot(len)
    }

    /// Purge expired entries every `interval` on a background task.
    ///
    /// The task holds only a weak reference and exits once the cache is dropped.
    pub fn spawn_sweeper(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let weak = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                match weak.upgrade() {
                    Some(cache) => {
                        cache.purge_expired().await;
                    }
                    None => break,
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_get_after_insert() {
        let cache = TtlCache::new(Duration::from_secs(300)).unwrap();
        cache.insert("key1".to_string(), 42u32).await;

        assert_eq!(cache.get(&"key1".to_string()).await, Some(42));
        assert_eq!(cache.get(&"missing".to_string()).await, None);

        let stats = cache.stats().await;
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.insertions, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_not_served_without_sweep() {
        let cache = TtlCache::new(Duration::from_secs(300)).unwrap();
        cache.insert("key1", "value").await;

        tokio::time::advance(Duration::from_secs(299)).await;
        assert_eq!(cache.get(&"key1").await, Some("value"));

        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(cache.get(&"key1").await, None);
        assert_eq!(cache.len().await, 0);
        assert_eq!(cache.stats().await.evictions, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reinsert_restarts_ttl() {
        let cache = TtlCache::new(Duration::from_secs(10)).unwrap();
        cache.insert(1u8, "a").await;
        tokio::time::advance(Duration::from_secs(8)).await;
        cache.insert(1u8, "b").await;
        tokio::time::advance(Duration::from_secs(8)).await;

        assert_eq!(cache.get(&1).await, Some("b"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_expired() {
        let cache = TtlCache::new(Duration::from_secs(10)).unwrap();
        cache.insert(1u8, "old").await;
        tokio::time::advance(Duration::from_secs(6)).await;
        cache.insert(2u8, "new").await;
        tokio::time::advance(Duration::from_secs(5)).await;

        assert_eq!(cache.purge_expired().await, 1);
        assert_eq!(cache.len().await, 1);
        assert_eq!(cache.get(&2).await, Some("new"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_purges_in_background() {
        let cache = Arc::new(TtlCache::new(Duration::from_secs(5)).unwrap());
        let handle = cache.spawn_sweeper(Duration::from_secs(1));
        cache.insert("k", 1).await;

        tokio::time::sleep(Duration::from_secs(7)).await;
        assert!(cache.is_empty().await);

        handle.abort();
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let result = TtlCache::<String, u8>::new(Duration::ZERO);
        assert!(matches!(result, Err(CacheError::InvalidTtl { .. })));
    }

    #[tokio::test]
    async fn test_remove_and_clear() {
        let cache = TtlCache::new(Duration::from_secs(60)).unwrap();
        cache.insert("a", 1).await;
        cache.insert("b", 2).await;

        assert!(cache.remove(&"a").await);
        assert!(!cache.remove(&"a").await);
        cache.clear().await;
        assert!(cache.is_empty().await);
    }
}
