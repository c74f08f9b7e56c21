//! Best-effort IP geolocation contract.

use async_trait::async_trait;

use crate::domain::entities::GeoLocation;

/// Outcome of a geolocation lookup.
///
/// Lookups never fail from the caller's point of view: timeouts, malformed
/// responses and unreachable providers all collapse to [`GeoLookup::Unavailable`].
#[derive(Debug, Clone, PartialEq)]
pub enum GeoLookup {
    Enriched(GeoLocation),
    Unavailable,
}

impl GeoLookup {
    /// Collapses the lookup into the value persisted with a click.
    pub fn into_location(self) -> GeoLocation {
        match self {
            Self::Enriched(location) => location,
            Self::Unavailable => GeoLocation::default(),
        }
    }

    pub fn is_enriched(&self) -> bool {
        matches!(self, Self::Enriched(_))
    }
}

/// Maps an IP address to coarse geolocation.
///
/// # Implementations
///
/// - [`crate::infrastructure::geo::HttpGeoEnricher`] - JSON lookup over HTTP with a bounded timeout
/// - [`crate::infrastructure::geo::NullGeoEnricher`] - always unavailable
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GeoEnricher: Send + Sync {
    /// Looks up `ip_address`. Implementations must return within their timeout.
    async fn lookup(&self, ip_address: &str) -> GeoLookup;
}
