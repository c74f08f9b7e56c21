//! Alias entity representing a short code mapped to a destination.

use chrono::{DateTime, Utc};

/// A short code and the destination it redirects to.
///
/// Aliases are write-once: there is no update path for `destination_url`.
/// Repointing requires a new alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias {
    pub code: String,
    pub destination_url: String,
    pub owner_id: String,
    /// Optional topic used for grouped analytics.
    pub group: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Alias {
    /// Creates a new Alias instance.
    pub fn new(
        code: String,
        destination_url: String,
        owner_id: String,
        group: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            code,
            destination_url,
            owner_id,
            group,
            created_at,
        }
    }

    /// Returns true if this alias redirects to `destination`.
    pub fn points_to(&self, destination: &str) -> bool {
        self.destination_url == destination
    }
}

/// Input data for creating a new alias.
///
/// `created_at` is assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAlias {
    pub code: String,
    pub destination_url: String,
    pub owner_id: String,
    pub group: Option<String>,
}

impl NewAlias {
    /// Materializes the alias with a creation timestamp.
    pub fn into_alias(self, created_at: DateTime<Utc>) -> Alias {
        Alias::new(
            self.code,
            self.destination_url,
            self.owner_id,
            self.group,
            created_at,
        )
    }
}
