//! Handler for alias creation.

use axum::{Json, extract::State, extract::rejection::JsonRejection, http::StatusCode};
use validator::Validate;

use crate::api::dto::links::{CreateLinkRequest, LinkResponse};
use crate::api::middleware::identity::UserId;
use crate::application::services::CreateAlias;
use crate::error::AppError;
use crate::state::AppState;

/// Creates an alias for a destination URL.
///
/// # Endpoint
///
/// `POST /links` (requires `X-User-Id`)
///
/// # Request Body
///
/// ```json
/// { "destinationUrl": "https://example.com/spring", "alias": "promo", "group": "spring" }
/// ```
///
/// # Responses
///
/// - **201 Created**: new alias
/// - **200 OK**: the alias already pointed at this destination
/// - **400**: invalid URL or alias code
/// - **401**: missing identity
/// - **409**: alias taken by a different destination
pub async fn create_link_handler(
    State(state): State<AppState>,
    UserId(owner_id): UserId,
    payload: Result<Json<CreateLinkRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let creation = state
        .resolver
        .create_alias(CreateAlias {
            destination_url: payload.destination_url,
            requested_code: payload.alias,
            group: payload.group,
            owner_id,
        })
        .await?;

    let status = if creation.is_created() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(creation.into_alias().into())))
}
