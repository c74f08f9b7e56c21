//! Alias creation and cache-aside resolution.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info, warn};

use crate::application::services::ClickRecorder;
use crate::domain::click_context::ClickContext;
use crate::domain::entities::{Alias, NewAlias};
use crate::domain::repositories::DestinationStore;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;
use crate::utils::code_generator::{generate_code, validate_custom_code};
use crate::utils::url_normalizer::normalize_url;

const MAX_GENERATE_ATTEMPTS: usize = 10;

/// Outcome of [`LinkResolver::create_alias`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AliasCreation {
    /// A new alias was written.
    Created(Alias),
    /// The code already pointed at the same destination; nothing was written.
    Existing(Alias),
}

impl AliasCreation {
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }

    pub fn alias(&self) -> &Alias {
        match self {
            Self::Created(alias) | Self::Existing(alias) => alias,
        }
    }

    pub fn into_alias(self) -> Alias {
        match self {
            Self::Created(alias) | Self::Existing(alias) => alias,
        }
    }
}

/// Input to [`LinkResolver::create_alias`].
#[derive(Debug, Clone, Default)]
pub struct CreateAlias {
    pub destination_url: String,
    pub requested_code: Option<String>,
    pub group: Option<String>,
    pub owner_id: String,
}

/// Maps alias codes to destinations.
///
/// Reads go cache-first; the destination store is consulted on a miss and the
/// cache is repopulated. Cache errors of any kind count as misses.
///
/// Creation is first-writer-wins: re-creating a code with the same normalized
/// destination returns the stored alias, a different destination is a
/// conflict.
pub struct LinkResolver {
    destinations: Arc<dyn DestinationStore>,
    cache: Arc<dyn CacheService>,
    recorder: Arc<ClickRecorder>,
}

impl LinkResolver {
    pub fn new(
        destinations: Arc<dyn DestinationStore>,
        cache: Arc<dyn CacheService>,
        recorder: Arc<ClickRecorder>,
    ) -> Self {
        Self {
            destinations,
            cache,
            recorder,
        }
    }

    /// Creates an alias, or returns the existing one for an idempotent repeat.
    ///
    /// Without a requested code a random 12-character code is generated,
    /// retrying on collision.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] for a malformed URL or requested code
    /// - [`AppError::Conflict`] when the code maps to another destination
    /// - [`AppError::Internal`] on store failure or exhausted code generation
    pub async fn create_alias(&self, request: CreateAlias) -> Result<AliasCreation, AppError> {
        let destination_url = normalize_url(&request.destination_url).map_err(|e| {
            AppError::bad_request("Invalid URL format", json!({ "reason": e.to_string() }))
        })?;
        let group = request
            .group
            .map(|g| g.trim().to_string())
            .filter(|g| !g.is_empty());

        if let Some(code) = request.requested_code {
            validate_custom_code(&code)?;
            let new_alias = NewAlias {
                code,
                destination_url,
                owner_id: request.owner_id,
                group,
            };
            return self.insert_or_reconcile(new_alias).await;
        }

        for _ in 0..MAX_GENERATE_ATTEMPTS {
            let code = generate_code().map_err(|e| {
                AppError::internal("Failed to generate code", json!({ "reason": e.to_string() }))
            })?;
            let new_alias = NewAlias {
                code,
                destination_url: destination_url.clone(),
                owner_id: request.owner_id.clone(),
                group: group.clone(),
            };

            if let Some(alias) = self.destinations.insert_if_absent(new_alias).await? {
                info!(alias = %alias.code, "Alias created");
                return Ok(AliasCreation::Created(alias));
            }
            debug!("Generated code collided, retrying");
        }

        Err(AppError::internal(
            "Failed to generate unique code",
            json!({ "reason": "Too many collisions" }),
        ))
    }

    async fn insert_or_reconcile(&self, new_alias: NewAlias) -> Result<AliasCreation, AppError> {
        let code = new_alias.code.clone();
        let destination_url = new_alias.destination_url.clone();

        if let Some(alias) = self.destinations.insert_if_absent(new_alias).await? {
            info!(alias = %alias.code, "Alias created");
            return Ok(AliasCreation::Created(alias));
        }

        match self.destinations.find_by_code(&code).await? {
            Some(existing) if existing.points_to(&destination_url) => {
                debug!(alias = %code, "Alias already exists with same destination");
                Ok(AliasCreation::Existing(existing))
            }
            Some(existing) => Err(AppError::alias_conflict(&code, &existing.destination_url)),
            None => Err(AppError::internal(
                "Alias vanished after conflicting insert",
                json!({ "alias": code }),
            )),
        }
    }

    /// Resolves an alias to its destination URL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the alias does not exist, or
    /// [`AppError::Internal`] if the destination store fails.
    pub async fn resolve(&self, code: &str) -> Result<String, AppError> {
        match self.cache.get_url(code).await {
            Ok(Some(url)) => {
                metrics::counter!("redirect_cache_lookups_total", "result" => "hit").increment(1);
                debug!(alias = %code, "Cache hit");
                return Ok(url);
            }
            Ok(None) => {
                metrics::counter!("redirect_cache_lookups_total", "result" => "miss").increment(1);
                debug!(alias = %code, "Cache miss");
            }
            Err(e) => {
                metrics::counter!("redirect_cache_lookups_total", "result" => "error").increment(1);
                warn!(alias = %code, error = %e, "Cache read failed, falling back to store");
            }
        }

        let alias = self
            .destinations
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::alias_not_found(code))?;

        if let Err(e) = self
            .cache
            .set_url(code, &alias.destination_url, None)
            .await
        {
            warn!(alias = %code, error = %e, "Failed to populate cache");
        }

        Ok(alias.destination_url)
    }

    /// Resolves an alias and records the click.
    ///
    /// # Errors
    ///
    /// Everything [`Self::resolve`] returns, plus
    /// [`AppError::EventPersistence`] if the click cannot be stored.
    pub async fn resolve_and_record(
        &self,
        code: &str,
        context: &ClickContext,
    ) -> Result<String, AppError> {
        let destination = self.resolve(code).await?;
        self.recorder.record(code, &destination, context).await?;
        Ok(destination)
    }

    /// Looks up an alias without touching the cache.
    pub async fn find_alias(&self, code: &str) -> Result<Option<Alias>, AppError> {
        self.destinations.find_by_code(code).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::geo::{GeoLookup, MockGeoEnricher};
    use crate::domain::repositories::{MockDestinationStore, MockEventStore};
    use crate::infrastructure::cache::{CacheError, MockCacheService};
    use crate::infrastructure::persistence::MemoryDestinationStore;
    use chrono::Utc;

    fn alias(code: &str, url: &str) -> Alias {
        Alias::new(
            code.to_string(),
            url.to_string(),
            "owner".to_string(),
            None,
            Utc::now(),
        )
    }

    fn idle_recorder() -> Arc<ClickRecorder> {
        Arc::new(ClickRecorder::new(
            Arc::new(MockGeoEnricher::new()),
            Arc::new(MockEventStore::new()),
            Arc::new(MockCacheService::new()),
        ))
    }

    fn resolver(store: MockDestinationStore, cache: MockCacheService) -> LinkResolver {
        LinkResolver::new(Arc::new(store), Arc::new(cache), idle_recorder())
    }

    fn request(url: &str, code: Option<&str>) -> CreateAlias {
        CreateAlias {
            destination_url: url.to_string(),
            requested_code: code.map(str::to_string),
            group: None,
            owner_id: "owner".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_alias_with_requested_code() {
        let mut store = MockDestinationStore::new();
        store
            .expect_insert_if_absent()
            .withf(|new_alias| new_alias.code == "promo" && new_alias.destination_url == "https://example.com/")
            .times(1)
            .returning(|new_alias| Ok(Some(new_alias.into_alias(Utc::now()))));

        let created = resolver(store, MockCacheService::new())
            .create_alias(request("https://EXAMPLE.com:443/#top", Some("promo")))
            .await
            .unwrap();

        assert!(created.is_created());
        assert_eq!(created.alias().destination_url, "https://example.com/");
    }

    #[tokio::test]
    async fn test_create_alias_short_code_in_memory_store() {
        let store = Arc::new(MemoryDestinationStore::new());
        let resolver = LinkResolver::new(
            store.clone(),
            Arc::new(MockCacheService::new()),
            idle_recorder(),
        );

        let created = resolver
            .create_alias(request("http://example.com", Some("abc")))
            .await
            .unwrap();

        assert!(created.is_created());
        assert_eq!(created.alias().code, "abc");
        assert_eq!(created.alias().destination_url, "http://example.com/");
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_create_alias_same_destination_is_idempotent() {
        let mut store = MockDestinationStore::new();
        store
            .expect_insert_if_absent()
            .times(1)
            .returning(|_| Ok(None));
        store
            .expect_find_by_code()
            .times(1)
            .returning(|_| Ok(Some(alias("abc1", "http://example.com/"))));

        let result = resolver(store, MockCacheService::new())
            .create_alias(request("http://example.com", Some("abc1")))
            .await
            .unwrap();

        assert!(matches!(result, AliasCreation::Existing(ref a) if a.code == "abc1"));
    }

    #[tokio::test]
    async fn test_create_alias_different_destination_conflicts() {
        let mut store = MockDestinationStore::new();
        store.expect_insert_if_absent().returning(|_| Ok(None));
        store
            .expect_find_by_code()
            .returning(|_| Ok(Some(alias("abc1", "http://other.com/"))));

        let result = resolver(store, MockCacheService::new())
            .create_alias(request("http://example.com", Some("abc1")))
            .await;

        assert!(matches!(result, Err(AppError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_create_alias_invalid_url() {
        let result = resolver(MockDestinationStore::new(), MockCacheService::new())
            .create_alias(request("ftp://example.com", None))
            .await;

        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_create_alias_reserved_code() {
        let result = resolver(MockDestinationStore::new(), MockCacheService::new())
            .create_alias(request("https://example.com", Some("stats")))
            .await;

        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_generated_code_retries_on_collision() {
        let mut store = MockDestinationStore::new();
        let mut seq = mockall::Sequence::new();
        store
            .expect_insert_if_absent()
            .times(2)
            .in_sequence(&mut seq)
            .returning(|_| Ok(None));
        store
            .expect_insert_if_absent()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|new_alias| Ok(Some(new_alias.into_alias(Utc::now()))));

        let created = resolver(store, MockCacheService::new())
            .create_alias(request("https://example.com", None))
            .await
            .unwrap();

        assert!(created.is_created());
        assert_eq!(created.alias().code.len(), 12);
    }

    #[tokio::test]
    async fn test_generated_code_gives_up_after_max_attempts() {
        let mut store = MockDestinationStore::new();
        store
            .expect_insert_if_absent()
            .times(MAX_GENERATE_ATTEMPTS)
            .returning(|_| Ok(None));

        let result = resolver(store, MockCacheService::new())
            .create_alias(request("https://example.com", None))
            .await;

        assert!(matches!(result, Err(AppError::Internal { .. })));
    }

    #[tokio::test]
    async fn test_resolve_cache_hit_skips_store() {
        let mut store = MockDestinationStore::new();
        store.expect_find_by_code().times(0);
        let mut cache = MockCacheService::new();
        cache
            .expect_get_url()
            .returning(|_| Ok(Some("https://cached.example/".to_string())));

        let url = resolver(store, cache).resolve("abc").await.unwrap();

        assert_eq!(url, "https://cached.example/");
    }

    #[tokio::test]
    async fn test_resolve_cache_miss_populates_cache() {
        let mut store = MockDestinationStore::new();
        store
            .expect_find_by_code()
            .times(1)
            .returning(|_| Ok(Some(alias("abc", "https://example.com/"))));
        let mut cache = MockCacheService::new();
        cache.expect_get_url().returning(|_| Ok(None));
        cache
            .expect_set_url()
            .withf(|code, url, _| code == "abc" && url == "https://example.com/")
            .times(1)
            .returning(|_, _, _| Ok(()));

        let url = resolver(store, cache).resolve("abc").await.unwrap();

        assert_eq!(url, "https://example.com/");
    }

    #[tokio::test]
    async fn test_resolve_cache_error_is_a_miss() {
        let mut store = MockDestinationStore::new();
        store
            .expect_find_by_code()
            .times(1)
            .returning(|_| Ok(Some(alias("abc", "https://example.com/"))));
        let mut cache = MockCacheService::new();
        cache
            .expect_get_url()
            .returning(|_| Err(CacheError::Unavailable("connection refused".to_string())));
        cache
            .expect_set_url()
            .returning(|_, _, _| Err(CacheError::Unavailable("connection refused".to_string())));

        let url = resolver(store, cache).resolve("abc").await.unwrap();

        assert_eq!(url, "https://example.com/");
    }

    #[tokio::test]
    async fn test_resolve_unknown_alias() {
        let mut store = MockDestinationStore::new();
        store.expect_find_by_code().returning(|_| Ok(None));
        let mut cache = MockCacheService::new();
        cache.expect_get_url().returning(|_| Ok(None));
        cache.expect_set_url().times(0);

        let result = resolver(store, cache).resolve("missing").await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_resolve_and_record_appends_event() {
        let mut store = MockDestinationStore::new();
        store.expect_find_by_code().times(0);
        let mut cache = MockCacheService::new();
        cache
            .expect_get_url()
            .returning(|_| Ok(Some("https://example.com/".to_string())));
        cache.expect_set_url().returning(|_, _, _| Ok(()));
        let cache: Arc<dyn CacheService> = Arc::new(cache);

        let mut geo = MockGeoEnricher::new();
        geo.expect_lookup().returning(|_| GeoLookup::Unavailable);
        let mut events = MockEventStore::new();
        events
            .expect_append()
            .withf(|e| e.alias_code == "abc" && e.user_id == "u1")
            .times(1)
            .returning(|e| Ok(e.into_event(1, Utc::now())));

        let recorder = Arc::new(ClickRecorder::new(
            Arc::new(geo),
            Arc::new(events),
            cache.clone(),
        ));
        let resolver = LinkResolver::new(Arc::new(store), cache, recorder);

        let context = ClickContext::new("u1", "8.8.8.8", "Linux", "desktop");
        let url = resolver.resolve_and_record("abc", &context).await.unwrap();

        assert_eq!(url, "https://example.com/");
    }
}
