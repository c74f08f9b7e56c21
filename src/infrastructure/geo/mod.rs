//! Geolocation adapters for click enrichment.
//!
//! - [`HttpGeoEnricher`] - JSON lookup against an HTTP endpoint
//! - [`NullGeoEnricher`] - disabled enrichment

mod http_geo;
mod null_geo;

pub use http_geo::{GeoError, HttpGeoEnricher};
pub use null_geo::NullGeoEnricher;
