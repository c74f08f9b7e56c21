#![allow(dead_code)]

use async_trait::async_trait;
use axum::extract::ConnectInfo;
use axum_test::TestServer;
use chrono::{DateTime, Utc};
use clicktrail::api::routes::api_routes;
use clicktrail::domain::entities::{Alias, ClickEvent, GeoLocation, NewAlias, NewClickEvent};
use clicktrail::domain::repositories::{DestinationStore, EventStore};
use clicktrail::domain::window::TimeWindow;
use clicktrail::error::AppError;
use clicktrail::infrastructure::cache::{CacheService, MemoryCache};
use clicktrail::infrastructure::geo::NullGeoEnricher;
use clicktrail::infrastructure::persistence::{MemoryDestinationStore, MemoryEventStore};
use clicktrail::state::AppState;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tower::Layer;

pub const PEER_ADDR: &str = "127.0.0.1:12345";

#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = PEER_ADDR.parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}

/// In-memory destination store that counts lookups.
#[derive(Default)]
pub struct CountingDestinationStore {
    inner: MemoryDestinationStore,
    lookups: AtomicUsize,
    offline: bool,
}

impl CountingDestinationStore {
    /// A store whose health check fails.
    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Default::default()
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DestinationStore for CountingDestinationStore {
    async fn find_by_code(&self, code: &str) -> Result<Option<Alias>, AppError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.find_by_code(code).await
    }

    async fn insert_if_absent(&self, new_alias: NewAlias) -> Result<Option<Alias>, AppError> {
        self.inner.insert_if_absent(new_alias).await
    }

    async fn list_codes_by_group(&self, group: &str) -> Result<Vec<String>, AppError> {
        self.inner.list_codes_by_group(group).await
    }

    async fn ping(&self) -> Result<(), AppError> {
        if self.offline {
            return Err(AppError::internal("Database error", json!({})));
        }
        self.inner.ping().await
    }
}

/// Event store whose appends always fail.
pub struct RejectingEventStore;

#[async_trait]
impl EventStore for RejectingEventStore {
    async fn append(&self, _new_event: NewClickEvent) -> Result<ClickEvent, AppError> {
        Err(AppError::internal("Database error", json!({})))
    }

    async fn query_by_alias_set(
        &self,
        _codes: &[String],
        _window: TimeWindow,
    ) -> Result<Vec<ClickEvent>, AppError> {
        Ok(vec![])
    }

    async fn query_all(&self, _window: TimeWindow) -> Result<Vec<ClickEvent>, AppError> {
        Ok(vec![])
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub destinations: Arc<CountingDestinationStore>,
    pub events: Arc<MemoryEventStore>,
    pub cache: Arc<MemoryCache>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_destinations(CountingDestinationStore::default())
    }

    pub fn with_destinations(destinations: CountingDestinationStore) -> Self {
        let destinations = Arc::new(destinations);
        let events = Arc::new(MemoryEventStore::new());
        let cache = Arc::new(MemoryCache::default());

        let state = AppState::new(
            destinations.clone(),
            events.clone(),
            cache.clone(),
            Arc::new(NullGeoEnricher::new()),
            false,
        );

        Self {
            server: server_for(state),
            destinations,
            events,
            cache,
        }
    }

    /// Seeds an alias directly into the store.
    pub async fn seed_alias(&self, code: &str, destination: &str, group: Option<&str>) {
        let created = self
            .destinations
            .insert_if_absent(NewAlias {
                code: code.to_string(),
                destination_url: destination.to_string(),
                owner_id: "seed".to_string(),
                group: group.map(str::to_string),
            })
            .await
            .unwrap();
        assert!(created.is_some());
    }

    /// Seeds a click at a fixed time.
    pub fn seed_click(&self, code: &str, user: &str, os: &str, at: DateTime<Utc>) -> ClickEvent {
        self.events.append_at(
            NewClickEvent {
                alias_code: code.to_string(),
                user_id: user.to_string(),
                ip_address: "203.0.113.7".to_string(),
                geo_location: GeoLocation::default(),
                operating_system: os.to_string(),
                device_class: "mobile".to_string(),
            },
            at,
        )
    }

    pub async fn clear_cache(&self) {
        self.cache.clear().await;
    }

    pub async fn cached(&self, code: &str) -> Option<String> {
        self.cache.get_url(code).await.unwrap()
    }
}

/// Router with every API route and a fake peer address, without rate limiting.
pub fn server_for(state: AppState) -> TestServer {
    let app = api_routes().layer(MockConnectInfoLayer).with_state(state);
    TestServer::new(app).unwrap()
}
