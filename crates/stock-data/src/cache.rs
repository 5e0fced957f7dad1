//! Short-lived cache of fetched market data

use crate::provider::MarketData;
use cached::{Cached, TimedCache};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Thread-safe, in-memory cache keyed by uppercase symbol.
///
/// Only usable data (with a price) is stored, so a miss on an unknown symbol
/// is re-fetched on the next lookup.
pub struct SnapshotCache {
    cache: Arc<RwLock<TimedCache<String, MarketData>>>,
}

fn key(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

impl SnapshotCache {
    /// Create a new cache with specified TTL
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: Arc::new(RwLock::new(TimedCache::with_lifespan(ttl))),
        }
    }

    /// Get a value from the cache
    pub async fn get(&self, symbol: &str) -> Option<MarketData> {
        let mut cache = self.cache.write().await;
        cache.cache_get(&key(symbol)).cloned()
    }

    /// Insert usable data; anything without a price is ignored
    pub async fn insert(&self, data: MarketData) {
        if !data.is_usable() {
            return;
        }
        let mut cache = self.cache.write().await;
        let _ = cache.cache_set(key(&data.symbol), data);
    }

    /// Get or fetch a value using the provided fetcher function
    ///
    /// If the value exists in cache, it's returned immediately.
    /// Otherwise, the fetcher function is called and a usable result is cached.
    pub async fn get_or_fetch<F, Fut, E>(&self, symbol: &str, fetcher: F) -> Result<MarketData, E>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<MarketData, E>>,
    {
        if let Some(data) = self.get(symbol).await {
            tracing::debug!(symbol, "Cache hit");
            return Ok(data);
        }

        tracing::debug!(symbol, "Cache miss");

        let data = fetcher().await?;
        self.insert(data.clone()).await;

        Ok(data)
    }

    /// Invalidate a specific cache entry
    pub async fn invalidate(&self, symbol: &str) {
        let mut cache = self.cache.write().await;
        let _ = cache.cache_remove(&key(symbol));
    }

    /// Clear all cached entries
    pub async fn clear(&self) {
        let mut cache = self.cache.write().await;
        cache.cache_clear();
    }

    /// Get the number of cached entries
    pub async fn len(&self) -> usize {
        let cache = self.cache.read().await;
        cache.cache_size()
    }

    /// Check if the cache is empty
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Clone for SnapshotCache {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stock_core::QuoteSnapshot;

    fn priced(symbol: &str, price: f64) -> MarketData {
        MarketData {
            symbol: symbol.to_string(),
            snapshot: QuoteSnapshot {
                current_price: Some(price),
                ..Default::default()
            },
            history: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_cache_insert_and_get_is_case_insensitive() {
        let cache = SnapshotCache::new(Duration::from_secs(60));
        cache.insert(priced("AAPL", 150.0)).await;

        let hit = cache.get("aapl").await.unwrap();
        assert_eq!(hit.snapshot.price(), Some(150.0));
        assert!(cache.get("MSFT").await.is_none());
    }

    #[tokio::test]
    async fn test_cache_skips_unusable_data() {
        let cache = SnapshotCache::new(Duration::from_secs(60));
        cache.insert(MarketData::empty("NOPE")).await;
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_cache_get_or_fetch() {
        let cache = SnapshotCache::new(Duration::from_secs(60));

        let mut call_count = 0;
        let result = cache
            .get_or_fetch("VALE3.SA", || {
                call_count += 1;
                async { Ok::<_, String>(priced("VALE3.SA", 61.2)) }
            })
            .await
            .unwrap();
        assert_eq!(result.snapshot.price(), Some(61.2));
        assert_eq!(call_count, 1);

        let result = cache
            .get_or_fetch("VALE3.SA", || {
                call_count += 1;
                async { Ok::<_, String>(priced("VALE3.SA", 0.5)) }
            })
            .await
            .unwrap();
        assert_eq!(result.snapshot.price(), Some(61.2));
        assert_eq!(call_count, 1);
    }

    #[tokio::test]
    async fn test_cache_invalidation_and_clear() {
        let cache = SnapshotCache::new(Duration::from_secs(60));
        cache.insert(priced("AAPL", 1.0)).await;
        cache.insert(priced("MSFT", 2.0)).await;
        assert_eq!(cache.len().await, 2);

        cache.invalidate("aapl").await;
        assert!(cache.get("AAPL").await.is_none());
        assert_eq!(cache.len().await, 1);

        cache.clear().await;
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_cache_clones_share_storage() {
        let cache = SnapshotCache::new(Duration::from_secs(60));
        let other = cache.clone();
        other.insert(priced("NU", 12.0)).await;
        assert_eq!(cache.len().await, 1);
    }
}
