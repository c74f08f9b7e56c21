//! In-process cache backed by moka.

use super::service::{CacheResult, CacheService};
use async_trait::async_trait;
use moka::future::Cache;
use std::time::Duration;
use tracing::debug;

/// Bounded in-process cache with a uniform time-to-live.
///
/// Suitable for single-instance deployments and tests. Entries are evicted by
/// TTL or when capacity is reached; per-call TTL overrides are ignored.
#[derive(Clone)]
pub struct MemoryCache {
    inner: Cache<String, String>,
}

impl MemoryCache {
    pub fn new(max_entries: u64, ttl_seconds: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_entries)
            .time_to_live(Duration::from_secs(ttl_seconds))
            .build();

        Self { inner }
    }

    /// Drops every entry.
    pub async fn clear(&self) {
        self.inner.invalidate_all();
        self.inner.run_pending_tasks().await;
    }

    /// Number of live entries after pending maintenance runs.
    pub async fn len(&self) -> u64 {
        self.inner.run_pending_tasks().await;
        self.inner.entry_count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(10_000, 3600)
    }
}

#[async_trait]
impl CacheService for MemoryCache {
    async fn get_url(&self, code: &str) -> CacheResult<Option<String>> {
        let value = self.inner.get(code).await;
        match &value {
            Some(url) => debug!("Cache HIT: {} -> {}", code, url),
            None => debug!("Cache MISS: {}", code),
        }
        Ok(value)
    }

    async fn set_url(
        &self,
        code: &str,
        destination_url: &str,
        _ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        self.inner
            .insert(code.to_string(), destination_url.to_string())
            .await;
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
