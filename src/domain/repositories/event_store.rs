//! Repository trait for the append-only click log.

use crate::domain::entities::{ClickEvent, NewClickEvent};
use crate::domain::window::TimeWindow;
use crate::error::AppError;
use async_trait::async_trait;

/// Durable, append-only store of click events.
///
/// Range queries return events whose `occurred_at` lies inside the window,
/// both bounds inclusive.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgEventStore`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::MemoryEventStore`] - in-process implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Appends a click event, assigning its id and timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn append(&self, new_event: NewClickEvent) -> Result<ClickEvent, AppError>;

    /// Returns in-window events for any of the given alias codes.
    ///
    /// An empty `codes` slice yields an empty result.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn query_by_alias_set(
        &self,
        codes: &[String],
        window: TimeWindow,
    ) -> Result<Vec<ClickEvent>, AppError>;

    /// Returns all in-window events.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn query_all(&self, window: TimeWindow) -> Result<Vec<ClickEvent>, AppError>;
}
