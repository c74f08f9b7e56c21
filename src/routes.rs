//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `POST /links`                - Create an alias
//! - `GET  /r/{alias}`            - Redirect
//! - `GET  /stats/*`              - Windowed analytics
//! - `GET  /health`               - Health check: DB, cache
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket, stricter on writes
//! - **Path normalization** - Trailing slash handling

use crate::api::middleware::rate_limit;
use crate::api::middleware::tracing;
use crate::api::routes::{read_routes, write_routes};
use crate::state::AppState;
use axum::Router;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// When `state.behind_proxy` is set, rate limiting keys on the forwarded
/// client IP instead of the peer socket address; enable only behind a
/// trusted reverse proxy.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let behind_proxy = state.behind_proxy;

    let writes = rate_limit::apply(write_routes(), rate_limit::WRITE, behind_proxy);
    let reads = rate_limit::apply(read_routes(), rate_limit::PUBLIC, behind_proxy);

    let router = Router::new()
        .merge(writes)
        .merge(reads)
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
