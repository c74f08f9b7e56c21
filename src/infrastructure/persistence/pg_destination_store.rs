//! PostgreSQL implementation of the destination store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Alias, NewAlias};
use crate::domain::repositories::DestinationStore;
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct AliasRow {
    code: String,
    destination_url: String,
    owner_id: String,
    topic: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<AliasRow> for Alias {
    fn from(r: AliasRow) -> Self {
        Alias::new(r.code, r.destination_url, r.owner_id, r.topic, r.created_at)
    }
}

/// PostgreSQL store for aliases.
///
/// Code uniqueness is the table's primary key; creation relies on
/// `ON CONFLICT DO NOTHING` rather than a check-then-insert.
pub struct PgDestinationStore {
    pool: Arc<PgPool>,
}

impl PgDestinationStore {
    /// Creates a new store with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DestinationStore for PgDestinationStore {
    async fn find_by_code(&self, code: &str) -> Result<Option<Alias>, AppError> {
        let row = sqlx::query_as::<_, AliasRow>(
            r#"
            SELECT code, destination_url, owner_id, topic, created_at
            FROM aliases
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Alias::from))
    }

    async fn insert_if_absent(&self, new_alias: NewAlias) -> Result<Option<Alias>, AppError> {
        let row = sqlx::query_as::<_, AliasRow>(
            r#"
            INSERT INTO aliases (code, destination_url, owner_id, topic)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (code) DO NOTHING
            RETURNING code, destination_url, owner_id, topic, created_at
            "#,
        )
        .bind(&new_alias.code)
        .bind(&new_alias.destination_url)
        .bind(&new_alias.owner_id)
        .bind(&new_alias.group)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Alias::from))
    }

    async fn list_codes_by_group(&self, group: &str) -> Result<Vec<String>, AppError> {
        let codes = sqlx::query_scalar::<_, String>(
            "SELECT code FROM aliases WHERE topic = $1 ORDER BY code",
        )
        .bind(group)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(codes)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await?;
        Ok(())
    }
}
