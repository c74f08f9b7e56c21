//! Handler for alias redirects.

use axum::{
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;

use crate::api::middleware::identity::user_id_from_headers;
use crate::domain::click_context::ClickContext;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_ip::client_ip;
use crate::utils::user_agent::profile_from_headers;

/// Redirects an alias to its destination and records the click.
///
/// # Endpoint
///
/// `GET /r/{alias}`
///
/// # Request Flow
///
/// 1. Resolve client IP (peer, or proxy headers when `BEHIND_PROXY`)
/// 2. Identity from `X-User-Id`, else the client IP
/// 3. OS and device from `User-Agent` (overridable by `X-Client-OS` / `X-Client-Device`)
/// 4. Resolve cache-aside and append the click event
/// 5. Return `302 Found`
///
/// The click is written before the response; a failed write fails the
/// redirect with 500.
///
/// # Errors
///
/// - 404 if the alias does not exist
/// - 500 if the click event cannot be persisted
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let ip_address = client_ip(&headers, addr, state.behind_proxy);
    let user_id = user_id_from_headers(&headers).unwrap_or_else(|| ip_address.clone());
    let profile = profile_from_headers(&headers);

    let context = ClickContext::new(
        user_id,
        ip_address,
        profile.operating_system,
        profile.device_class,
    );

    let destination = state.resolver.resolve_and_record(&code, &context).await?;

    Ok((
        StatusCode::FOUND,
        [
            (header::LOCATION, destination.as_str()),
            (header::CACHE_CONTROL, "no-store"),
        ],
    )
        .into_response())
}
