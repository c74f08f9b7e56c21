//! Repository trait for the durable alias → destination mapping.

use crate::domain::entities::{Alias, NewAlias};
use crate::error::AppError;
use async_trait::async_trait;

/// Durable store of aliases.
///
/// Uniqueness of `code` is enforced by the store itself, atomically, so
/// concurrent creations of the same code cannot both succeed.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgDestinationStore`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::MemoryDestinationStore`] - in-process implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DestinationStore: Send + Sync {
    /// Finds an alias by its code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_code(&self, code: &str) -> Result<Option<Alias>, AppError>;

    /// Inserts the alias unless the code is already taken.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Alias))` if this call created the record
    /// - `Ok(None)` if a record with the same code already existed
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn insert_if_absent(&self, new_alias: NewAlias) -> Result<Option<Alias>, AppError>;

    /// Lists the codes of all aliases classified under `group`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn list_codes_by_group(&self, group: &str) -> Result<Vec<String>, AppError>;

    /// Verifies the store is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the backend cannot be reached.
    async fn ping(&self) -> Result<(), AppError>;
}
