//! Shared application state.

use std::sync::Arc;

use crate::application::services::{Aggregator, ClickRecorder, LinkResolver};
use crate::domain::geo::GeoEnricher;
use crate::domain::repositories::{DestinationStore, EventStore};
use crate::infrastructure::cache::CacheService;

/// Handles injected into every handler.
///
/// Cloning is cheap; every field is an `Arc` or `Copy`.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<LinkResolver>,
    pub aggregator: Arc<Aggregator>,
    pub destinations: Arc<dyn DestinationStore>,
    pub cache: Arc<dyn CacheService>,
    /// When true, the client IP is read from `X-Forwarded-For` / `X-Real-IP`.
    pub behind_proxy: bool,
}

impl AppState {
    /// Wires the services from their backends.
    pub fn new(
        destinations: Arc<dyn DestinationStore>,
        events: Arc<dyn EventStore>,
        cache: Arc<dyn CacheService>,
        geo: Arc<dyn GeoEnricher>,
        behind_proxy: bool,
    ) -> Self {
        let recorder = Arc::new(ClickRecorder::new(geo, events.clone(), cache.clone()));
        let resolver = Arc::new(LinkResolver::new(
            destinations.clone(),
            cache.clone(),
            recorder,
        ));
        let aggregator = Arc::new(Aggregator::new(destinations.clone(), events));

        Self {
            resolver,
            aggregator,
            destinations,
            cache,
            behind_proxy,
        }
    }
}
