//! Click analytics service.

use std::sync::Arc;

use tracing::debug;

use crate::domain::aggregate::{AggregateResult, fold_events};
use crate::domain::repositories::{DestinationStore, EventStore};
use crate::domain::window::TimeWindow;
use crate::error::AppError;

/// Computes [`AggregateResult`]s on demand from the event log.
///
/// Nothing is cached or materialized; each call reads the window's events and
/// folds them.
pub struct Aggregator {
    destinations: Arc<dyn DestinationStore>,
    events: Arc<dyn EventStore>,
}

impl Aggregator {
    pub fn new(destinations: Arc<dyn DestinationStore>, events: Arc<dyn EventStore>) -> Self {
        Self {
            destinations,
            events,
        }
    }

    /// Aggregates every click in the window.
    pub async fn aggregate_overall(&self, window: TimeWindow) -> Result<AggregateResult, AppError> {
        let events = self.events.query_all(window).await?;
        Ok(fold_events(&events, window, false))
    }

    /// Aggregates clicks on every alias tagged with `group`.
    ///
    /// An unknown or empty group yields an all-zero result with an empty
    /// per-alias breakdown.
    pub async fn aggregate_by_topic(
        &self,
        group: &str,
        window: TimeWindow,
    ) -> Result<AggregateResult, AppError> {
        let codes = self.destinations.list_codes_by_group(group).await?;
        if codes.is_empty() {
            debug!(group = %group, "Topic has no aliases");
            return Ok(AggregateResult::empty(true));
        }

        let events = self.events.query_by_alias_set(&codes, window).await?;
        Ok(fold_events(&events, window, true))
    }

    /// Aggregates clicks on a single alias.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the alias does not exist.
    pub async fn aggregate_by_alias(
        &self,
        code: &str,
        window: TimeWindow,
    ) -> Result<AggregateResult, AppError> {
        if self.destinations.find_by_code(code).await?.is_none() {
            return Err(AppError::alias_not_found(code));
        }

        let codes = [code.to_string()];
        let events = self.events.query_by_alias_set(&codes, window).await?;
        Ok(fold_events(&events, window, false))
    }
}
