use async_trait::async_trait;

use crate::domain::geo::{GeoEnricher, GeoLookup};

/// Enricher used when `GEO_LOOKUP_URL` is not configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullGeoEnricher;

impl NullGeoEnricher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl GeoEnricher for NullGeoEnricher {
    async fn lookup(&self, _ip_address: &str) -> GeoLookup {
        GeoLookup::Unavailable
    }
}
