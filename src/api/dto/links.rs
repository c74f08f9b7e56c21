//! DTOs for alias creation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::Alias;

/// Request to create an alias.
///
/// Field-level checks here are coarse; URL normalization and code rules are
/// enforced by [`crate::application::services::LinkResolver`].
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLinkRequest {
    #[validate(length(min = 1, max = 2048, message = "destinationUrl must be 1-2048 characters"))]
    pub destination_url: String,

    /// Requested alias code; generated when absent.
    #[validate(length(min = 1, max = 64))]
    pub alias: Option<String>,

    /// Topic the alias is grouped under for analytics.
    #[validate(length(min = 1, max = 128))]
    pub group: Option<String>,
}

/// An alias as returned by `POST /links`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkResponse {
    pub alias: String,
    pub destination_url: String,
    pub group: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Alias> for LinkResponse {
    fn from(alias: Alias) -> Self {
        Self {
            alias: alias.code,
            destination_url: alias.destination_url,
            group: alias.group,
            created_at: alias.created_at,
        }
    }
}
