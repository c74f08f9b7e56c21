//! Click event recording.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, error, warn};

use crate::domain::click_context::ClickContext;
use crate::domain::entities::{ClickEvent, NewClickEvent};
use crate::domain::geo::GeoEnricher;
use crate::domain::repositories::EventStore;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;

/// Enriches, persists and re-caches one click.
///
/// Geolocation is best-effort and never blocks the write. The event append is
/// the only step whose failure is reported to the caller.
pub struct ClickRecorder {
    geo: Arc<dyn GeoEnricher>,
    events: Arc<dyn EventStore>,
    cache: Arc<dyn CacheService>,
}

impl ClickRecorder {
    pub fn new(
        geo: Arc<dyn GeoEnricher>,
        events: Arc<dyn EventStore>,
        cache: Arc<dyn CacheService>,
    ) -> Self {
        Self { geo, events, cache }
    }

    /// Records a click on `code`, which resolved to `destination`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::EventPersistence`] if the event store rejects the
    /// append. Cache write-back failures are logged and ignored.
    pub async fn record(
        &self,
        code: &str,
        destination: &str,
        context: &ClickContext,
    ) -> Result<ClickEvent, AppError> {
        let geo_location = self.geo.lookup(&context.ip_address).await.into_location();

        let new_event = NewClickEvent {
            alias_code: code.to_string(),
            user_id: context.user_id.clone(),
            ip_address: context.ip_address.clone(),
            geo_location,
            operating_system: context.operating_system.clone(),
            device_class: context.device_class.clone(),
        };

        let event = self.events.append(new_event).await.map_err(|e| {
            error!(alias = %code, error = %e, "Failed to persist click event");
            AppError::event_persistence(
                "Failed to record click",
                json!({ "alias": code, "reason": e.to_string() }),
            )
        })?;

        metrics::counter!("click_events_recorded_total").increment(1);
        debug!(alias = %code, event_id = event.id, "Click recorded");

        if let Err(e) = self.cache.set_url(code, destination, None).await {
            warn!(alias = %code, error = %e, "Cache write-back failed");
        }

        Ok(event)
    }
}
