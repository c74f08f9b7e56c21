//! Cache service trait and error types.

use async_trait::async_trait;

/// Errors that can occur during cache operations.
///
/// Never surfaced to clients: the resolver treats every variant as a miss.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache unavailable: {0}")]
    Unavailable(String),

    #[error("Cache operation error: {0}")]
    OperationError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Volatile alias → destination cache used on the redirect hot path.
///
/// Absence of an entry is a miss, never an error. Every entry can be rebuilt
/// from the destination store, so losing the cache is a latency problem only.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::MemoryCache`] - in-process cache with TTL and capacity
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Retrieves the destination URL for an alias code.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(url))` on cache hit
    /// - `Ok(None)` on cache miss
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the backend cannot be reached. Callers treat
    /// this the same as a miss.
    async fn get_url(&self, code: &str) -> CacheResult<Option<String>>;

    /// Stores an alias mapping with optional TTL in seconds.
    ///
    /// `None` uses the backend's configured default.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the write fails. Callers log and continue.
    async fn set_url(
        &self,
        code: &str,
        destination_url: &str,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    async fn health_check(&self) -> bool;

    /// Short backend label used in health output.
    fn backend(&self) -> &'static str;
}
