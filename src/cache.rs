// Render cache - cached record renderings, dropped when the record changes

use moka::future::Cache;
use std::time::Duration;
use tracing::debug;

use crate::config::CacheConfig;
use crate::record::Selector;

/// Cached renderings of records, keyed by entity and selector. A
/// successful update invalidates the affected entry so stale markup is
/// never served for a changed record.
#[derive(Debug, Clone)]
pub struct RenderCache {
    inner: Cache<String, String>,
}

impl RenderCache {
    pub fn new(capacity: u64, ttl: Duration) -> Self {
        let inner = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(ttl)
            .build();
        Self { inner }
    }

    /// Build the cache from configuration; `None` when disabled.
    pub fn from_config(cfg: &CacheConfig) -> Option<Self> {
        cfg.enabled
            .then(|| Self::new(cfg.capacity, Duration::from_secs(cfg.ttl_seconds)))
    }

    pub async fn get(&self, entity: &str, selector: &Selector) -> Option<String> {
        self.inner.get(&key(entity, selector)).await
    }

    pub async fn put(&self, entity: &str, selector: &Selector, rendered: String) {
        self.inner.insert(key(entity, selector), rendered).await;
    }

    pub async fn invalidate(&self, entity: &str, selector: &Selector) {
        self.inner.invalidate(&key(entity, selector)).await;
        debug!(entity = entity, selector = %selector, "render cache entry invalidated");
    }
}

fn key(entity: &str, selector: &Selector) -> String {
    format!("{entity}:{selector}")
}
