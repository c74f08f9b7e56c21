//! Handlers for windowed click analytics.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
};
use chrono::Utc;

use crate::api::dto::stats::{StatsResponse, WindowQuery};
use crate::error::AppError;
use crate::state::AppState;

type WindowParam = Result<Query<WindowQuery>, QueryRejection>;

/// Aggregates every click in the window.
///
/// # Endpoint
///
/// `GET /stats/overall?window=7d`
///
/// # Response
///
/// ```json
/// {
///   "scope": "overall",
///   "windowStart": "2024-03-03T12:00:00Z",
///   "windowEnd": "2024-03-10T12:00:00Z",
///   "totalClicks": 3,
///   "uniqueUsers": 2,
///   "clicksByDay": { "2024-03-08": 2, "2024-03-10": 1 },
///   "breakdownByOs": { "iOS": 3 },
///   "breakdownByDevice": { "mobile": 3 },
///   "breakdownByCountry": { "unknown": 3 }
/// }
/// ```
pub async fn overall_stats_handler(
    State(state): State<AppState>,
    query: WindowParam,
) -> Result<Json<StatsResponse>, AppError> {
    let Query(query) = query?;
    let window = query.resolve(Utc::now());

    let result = state.aggregator.aggregate_overall(window).await?;

    Ok(Json(StatsResponse::new("overall", None, window, result)))
}

/// Aggregates clicks on every alias in a topic, with a per-alias breakdown.
///
/// `GET /stats/topic/{group}?window=7d`. An unknown topic returns zeros.
pub async fn topic_stats_handler(
    State(state): State<AppState>,
    Path(group): Path<String>,
    query: WindowParam,
) -> Result<Json<StatsResponse>, AppError> {
    let Query(query) = query?;
    let window = query.resolve(Utc::now());

    let result = state.aggregator.aggregate_by_topic(&group, window).await?;

    Ok(Json(StatsResponse::new("topic", Some(group), window, result)))
}

/// Aggregates clicks on one alias.
///
/// `GET /stats/alias/{alias}?window=7d`. Returns 404 for an unknown alias.
pub async fn alias_stats_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
    query: WindowParam,
) -> Result<Json<StatsResponse>, AppError> {
    let Query(query) = query?;
    let window = query.resolve(Utc::now());

    let result = state.aggregator.aggregate_by_alias(&code, window).await?;

    Ok(Json(StatsResponse::new("alias", Some(code), window, result)))
}
