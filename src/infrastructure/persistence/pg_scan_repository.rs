//! PostgreSQL implementation of the scan event log.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{NewScanEvent, ScanEvent};
use crate::domain::repositories::{DayCount, FieldCount, ScanRepository, ScanScope};
use crate::error::AppError;

const EVENT_COLUMNS: &str = "id, qr_record_id, owner_id, occurred_at, ip, user_agent, referrer, \
     country, city, region, device_type, browser, os";

/// PostgreSQL repository for scan events.
///
/// Append-only: only INSERT and read-side aggregation queries exist here.
/// Day bucketing is done in UTC regardless of session time zone.
pub struct PgScanRepository {
    pool: Arc<PgPool>,
}

impl PgScanRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ScanRepository for PgScanRepository {
    async fn append(&self, event: NewScanEvent) -> Result<ScanEvent, AppError> {
        let sql = format!(
            "INSERT INTO scan_events \
             (qr_record_id, owner_id, ip, user_agent, referrer, country, city, region, device_type, browser, os) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {EVENT_COLUMNS}"
        );

        let saved = sqlx::query_as::<_, ScanEvent>(&sql)
            .bind(event.qr_record_id)
            .bind(event.owner_id)
            .bind(event.ip.as_deref())
            .bind(event.user_agent.as_deref())
            .bind(event.referrer.as_deref())
            .bind(event.country.as_deref())
            .bind(event.city.as_deref())
            .bind(event.region.as_deref())
            .bind(event.device_type.as_deref())
            .bind(event.browser.as_deref())
            .bind(event.os.as_deref())
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(saved)
    }

    async fn count_by_owner_since(
        &self,
        owner_id: i64,
        since: DateTime<Utc>,
    ) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM scan_events WHERE owner_id = $1 AND occurred_at >= $2",
        )
        .bind(owner_id)
        .bind(since)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count)
    }

    async fn count_by_record_since(
        &self,
        qr_record_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM scan_events WHERE qr_record_id = $1 AND occurred_at >= $2",
        )
        .bind(qr_record_id)
        .bind(since)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count)
    }

    async fn count_by_day(
        &self,
        scope: ScanScope,
        since: DateTime<Utc>,
    ) -> Result<Vec<DayCount>, AppError> {
        let sql = |filter: &str| {
            format!(
                "SELECT (occurred_at AT TIME ZONE 'UTC')::date AS day, COUNT(*) AS count \
                 FROM scan_events \
                 WHERE {filter} AND occurred_at >= $2 \
                 GROUP BY day \
                 ORDER BY day"
            )
        };

        let rows = match scope {
            ScanScope::Owner(owner_id) => {
                sqlx::query_as::<_, DayCount>(&sql("owner_id = $1"))
                    .bind(owner_id)
                    .bind(since)
                    .fetch_all(self.pool.as_ref())
                    .await?
            }
            ScanScope::Record(qr_record_id) => {
                sqlx::query_as::<_, DayCount>(&sql("qr_record_id = $1"))
                    .bind(qr_record_id)
                    .bind(since)
                    .fetch_all(self.pool.as_ref())
                    .await?
            }
        };

        Ok(rows)
    }

    async fn count_by_country(
        &self,
        owner_id: i64,
        since: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<FieldCount>, AppError> {
        let rows = sqlx::query_as::<_, FieldCount>(
            "SELECT country AS value, COUNT(*) AS count \
             FROM scan_events \
             WHERE owner_id = $1 AND occurred_at >= $2 \
             GROUP BY country \
             ORDER BY count DESC \
             LIMIT $3",
        )
        .bind(owner_id)
        .bind(since)
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows)
    }

    async fn count_by_device(
        &self,
        owner_id: i64,
        since: DateTime<Utc>,
    ) -> Result<Vec<FieldCount>, AppError> {
        let rows = sqlx::query_as::<_, FieldCount>(
            "SELECT device_type AS value, COUNT(*) AS count \
             FROM scan_events \
             WHERE owner_id = $1 AND occurred_at >= $2 \
             GROUP BY device_type \
             ORDER BY count DESC",
        )
        .bind(owner_id)
        .bind(since)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows)
    }

    async fn recent_by_record(
        &self,
        qr_record_id: Uuid,
        since: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<ScanEvent>, AppError> {
        let sql = format!(
            "SELECT {EVENT_COLUMNS} FROM scan_events \
             WHERE qr_record_id = $1 AND occurred_at >= $2 \
             ORDER BY occurred_at DESC \
             LIMIT $3"
        );

        let rows = sqlx::query_as::<_, ScanEvent>(&sql)
            .bind(qr_record_id)
            .bind(since)
            .bind(limit)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows)
    }
}
