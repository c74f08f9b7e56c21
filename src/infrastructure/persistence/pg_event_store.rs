//! PostgreSQL implementation of the click event store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{ClickEvent, GeoLocation, NewClickEvent};
use crate::domain::repositories::EventStore;
use crate::domain::window::TimeWindow;
use crate::error::AppError;

const CLICK_COLUMNS: &str = "id, alias_code, user_id, ip_address, \
     geo_city, geo_region, geo_country, geo_latitude, geo_longitude, \
     operating_system, device_class, occurred_at";

#[derive(sqlx::FromRow)]
struct ClickRow {
    id: i64,
    alias_code: String,
    user_id: String,
    ip_address: String,
    geo_city: Option<String>,
    geo_region: Option<String>,
    geo_country: Option<String>,
    geo_latitude: Option<f64>,
    geo_longitude: Option<f64>,
    operating_system: String,
    device_class: String,
    occurred_at: DateTime<Utc>,
}

impl From<ClickRow> for ClickEvent {
    fn from(r: ClickRow) -> Self {
        ClickEvent {
            id: r.id,
            alias_code: r.alias_code,
            user_id: r.user_id,
            ip_address: r.ip_address,
            geo_location: GeoLocation {
                city: r.geo_city,
                region: r.geo_region,
                country: r.geo_country,
                latitude: r.geo_latitude,
                longitude: r.geo_longitude,
            },
            operating_system: r.operating_system,
            device_class: r.device_class,
            occurred_at: r.occurred_at,
        }
    }
}

/// PostgreSQL repository for the append-only click log.
///
/// `occurred_at` is assigned by the database (`clock_timestamp()`).
pub struct PgEventStore {
    pool: Arc<PgPool>,
}

impl PgEventStore {
    /// Creates a new store with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventStore for PgEventStore {
    async fn append(&self, new_event: NewClickEvent) -> Result<ClickEvent, AppError> {
        let sql = format!(
            r#"
            INSERT INTO click_events (
                alias_code, user_id, ip_address,
                geo_city, geo_region, geo_country, geo_latitude, geo_longitude,
                operating_system, device_class
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {CLICK_COLUMNS}
            "#
        );

        let geo = &new_event.geo_location;
        let row = sqlx::query_as::<_, ClickRow>(&sql)
            .bind(&new_event.alias_code)
            .bind(&new_event.user_id)
            .bind(&new_event.ip_address)
            .bind(&geo.city)
            .bind(&geo.region)
            .bind(&geo.country)
            .bind(geo.latitude)
            .bind(geo.longitude)
            .bind(&new_event.operating_system)
            .bind(&new_event.device_class)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(row.into())
    }

    async fn query_by_alias_set(
        &self,
        codes: &[String],
        window: TimeWindow,
    ) -> Result<Vec<ClickEvent>, AppError> {
        if codes.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            r#"
            SELECT {CLICK_COLUMNS}
            FROM click_events
            WHERE alias_code = ANY($1)
              AND occurred_at >= $2
              AND occurred_at <= $3
            ORDER BY occurred_at, id
            "#
        );

        let rows = sqlx::query_as::<_, ClickRow>(&sql)
            .bind(codes)
            .bind(window.start)
            .bind(window.end)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(ClickEvent::from).collect())
    }

    async fn query_all(&self, window: TimeWindow) -> Result<Vec<ClickEvent>, AppError> {
        let sql = format!(
            r#"
            SELECT {CLICK_COLUMNS}
            FROM click_events
            WHERE occurred_at >= $1
              AND occurred_at <= $2
            ORDER BY occurred_at, id
            "#
        );

        let rows = sqlx::query_as::<_, ClickRow>(&sql)
            .bind(window.start)
            .bind(window.end)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(ClickEvent::from).collect())
    }
}
