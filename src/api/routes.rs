//! API route configuration.
//!
//! Routes are split by rate-limit class so [`crate::routes::app_router`] can
//! layer a stricter quota on writes.

use crate::api::handlers::{
    alias_stats_handler, create_link_handler, health_handler, overall_stats_handler,
    redirect_handler, topic_stats_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Alias creation.
///
/// - `POST /links` - Create an alias (requires `X-User-Id`)
pub fn write_routes() -> Router<AppState> {
    Router::new().route("/links", post(create_link_handler))
}

/// Redirects, analytics and health.
///
/// - `GET /r/{alias}`             - Redirect and record a click
/// - `GET /stats/overall`         - All clicks in the window
/// - `GET /stats/topic/{group}`   - Clicks on a topic, with per-alias breakdown
/// - `GET /stats/alias/{alias}`   - Clicks on one alias
/// - `GET /health`                - Database and cache checks
pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/r/{alias}", get(redirect_handler))
        .route("/stats/overall", get(overall_stats_handler))
        .route("/stats/topic/{group}", get(topic_stats_handler))
        .route("/stats/alias/{alias}", get(alias_stats_handler))
        .route("/health", get(health_handler))
}

/// Every API route without rate limiting.
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(write_routes()).merge(read_routes())
}
