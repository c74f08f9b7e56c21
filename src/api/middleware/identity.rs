//! Caller identity supplied by the upstream identity layer.
//!
//! The service never authenticates callers itself. Whatever sits in front of
//! it sets `X-User-Id`, and the value is treated as an opaque string.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, request::Parts},
};
use serde_json::json;

use crate::error::AppError;

pub const USER_ID_HEADER: &str = "x-user-id";

/// Reads a non-blank `X-User-Id` header value.
pub fn user_id_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Extractor for endpoints that require an identified caller.
///
/// Rejects with `401 Unauthorized` when `X-User-Id` is missing or blank.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(UserId(owner): UserId) -> String {
///     owner
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserId(pub String);

impl<S> FromRequestParts<S> for UserId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        user_id_from_headers(&parts.headers)
            .map(UserId)
            .ok_or_else(|| {
                AppError::unauthorized(
                    "Unauthorized",
                    json!({ "reason": "X-User-Id header is missing" }),
                )
            })
    }
}
