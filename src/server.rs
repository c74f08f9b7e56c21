//! HTTP server initialization and runtime setup.
//!
//! Selects store, cache and geolocation backends from [`Config`], applies
//! migrations, and runs the Axum server until Ctrl-C.

use crate::config::{CacheBackend, Config, StorageBackend};
use crate::domain::geo::GeoEnricher;
use crate::domain::repositories::{DestinationStore, EventStore};
use crate::infrastructure::cache::{CacheService, MemoryCache, NullCache, RedisCache};
use crate::infrastructure::geo::{HttpGeoEnricher, NullGeoEnricher};
use crate::infrastructure::persistence::{
    MemoryDestinationStore, MemoryEventStore, PgDestinationStore, PgEventStore,
};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Opens the PostgreSQL pool and applies pending migrations.
///
/// # Errors
///
/// Returns an error if the connection or a migration fails.
pub async fn connect_database(config: &Config) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to apply migrations")?;

    Ok(pool)
}

/// Builds the destination and event stores for the configured backend.
pub async fn build_stores(
    config: &Config,
) -> Result<(Arc<dyn DestinationStore>, Arc<dyn EventStore>)> {
    match config.storage_backend {
        StorageBackend::Postgres => {
            let pool = Arc::new(connect_database(config).await?);
            Ok((
                Arc::new(PgDestinationStore::new(pool.clone())),
                Arc::new(PgEventStore::new(pool)),
            ))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; aliases and clicks are lost on restart");
            Ok((
                Arc::new(MemoryDestinationStore::new()),
                Arc::new(MemoryEventStore::new()),
            ))
        }
    }
}

/// Builds the redirect cache.
///
/// A Redis connection failure degrades to [`NullCache`] rather than
/// aborting startup.
pub async fn build_cache(config: &Config) -> Arc<dyn CacheService> {
    match (config.cache_backend, &config.redis_url) {
        (CacheBackend::Redis, Some(redis_url)) => {
            match RedisCache::connect(redis_url, config.cache_ttl_seconds).await {
                Ok(redis) => {
                    tracing::info!("Cache enabled (Redis)");
                    Arc::new(redis)
                }
                Err(e) => {
                    tracing::warn!("Failed to connect to Redis: {}. Using NullCache.", e);
                    Arc::new(NullCache::new())
                }
            }
        }
        (CacheBackend::Memory, _) => {
            tracing::info!("Cache enabled (in-process)");
            Arc::new(MemoryCache::new(
                config.memory_cache_capacity,
                config.cache_ttl_seconds,
            ))
        }
        _ => {
            tracing::info!("Cache disabled (NullCache)");
            Arc::new(NullCache::new())
        }
    }
}

/// Builds the geolocation enricher; disabled when `GEO_LOOKUP_URL` is unset.
pub fn build_geo(config: &Config) -> Result<Arc<dyn GeoEnricher>> {
    match config.geo_lookup_url {
        Some(ref template) => {
            let enricher = HttpGeoEnricher::new(
                template.clone(),
                Duration::from_millis(config.geo_timeout_ms),
            )
            .context("Failed to build geolocation client")?;
            tracing::info!("Geolocation enabled");
            Ok(Arc::new(enricher))
        }
        None => {
            tracing::info!("Geolocation disabled");
            Ok(Arc::new(NullGeoEnricher::new()))
        }
    }
}

/// Runs the HTTP server with the given configuration.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - The geolocation client cannot be built
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let (destinations, events) = build_stores(&config).await?;
    let cache = build_cache(&config).await;
    let geo = build_geo(&config)?;

    let state = AppState::new(destinations, events, cache, geo, config.behind_proxy);
    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => tracing::error!("Failed to listen for Ctrl-C: {}", e),
    }
}
