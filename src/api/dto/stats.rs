//! DTOs for windowed analytics endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

use crate::domain::aggregate::AggregateResult;
use crate::domain::window::{TimeWindow, WindowSpec};

/// `?window=` query parameter.
///
/// Accepts `7d`, `24h`, `90m` or a bare number of days. Defaults to 7 days.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct WindowQuery {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub window: Option<WindowSpec>,
}

impl WindowQuery {
    /// Anchors the requested (or default) window at `now`.
    pub fn resolve(&self, now: DateTime<Utc>) -> TimeWindow {
        self.window.unwrap_or_default().ending_at(now)
    }
}

/// Aggregate result with the window it covers.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    /// `overall`, `topic` or `alias`.
    pub scope: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    #[serde(flatten)]
    pub result: AggregateResult,
}

impl StatsResponse {
    pub fn new(
        scope: &'static str,
        key: Option<String>,
        window: TimeWindow,
        result: AggregateResult,
    ) -> Self {
        Self {
            scope,
            key,
            window_start: window.start,
            window_end: window.end,
            result,
        }
    }
}
