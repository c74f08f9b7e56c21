//! Click event entity representing one resolved redirect.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Coarse geolocation attached to a click.
///
/// Every field is independently nullable. An all-`None` value is what gets
/// persisted when enrichment was unavailable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub city: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl GeoLocation {
    /// Returns true when no field carries data.
    pub fn is_empty(&self) -> bool {
        self.city.is_none()
            && self.region.is_none()
            && self.country.is_none()
            && self.latitude.is_none()
            && self.longitude.is_none()
    }
}

/// A click recorded when an alias is resolved.
///
/// Immutable and append-only. `occurred_at` is assigned by the event store at
/// write time.
#[derive(Debug, Clone, PartialEq)]
pub struct ClickEvent {
    pub id: i64,
    pub alias_code: String,
    pub user_id: String,
    pub ip_address: String,
    pub geo_location: GeoLocation,
    pub operating_system: String,
    pub device_class: String,
    pub occurred_at: DateTime<Utc>,
}

/// Input data for appending a click event.
#[derive(Debug, Clone, PartialEq)]
pub struct NewClickEvent {
    pub alias_code: String,
    pub user_id: String,
    pub ip_address: String,
    pub geo_location: GeoLocation,
    pub operating_system: String,
    pub device_class: String,
}

impl NewClickEvent {
    /// Materializes the event with a store-assigned id and timestamp.
    pub fn into_event(self, id: i64, occurred_at: DateTime<Utc>) -> ClickEvent {
        ClickEvent {
            id,
            alias_code: self.alias_code,
            user_id: self.user_id,
            ip_address: self.ip_address,
            geo_location: self.geo_location,
            operating_system: self.operating_system,
            device_class: self.device_class,
            occurred_at,
        }
    }
}
