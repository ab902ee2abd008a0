//! Repository trait for the append-only scan event log.

use crate::domain::entities::{NewScanEvent, ScanEvent};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Scope selector for time-series aggregation.
#[derive(Debug, Clone, Copy)]
pub enum ScanScope {
    Owner(i64),
    Record(Uuid),
}

/// Scans per calendar day (UTC).
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct DayCount {
    pub day: NaiveDate,
    pub count: i64,
}

/// Scans grouped by a single metadata field (country, device type).
///
/// `value` is `None` when the field was never enriched for those events.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct FieldCount {
    pub value: Option<String>,
    pub count: i64,
}

/// Repository interface for scan events.
///
/// Events are append-only: no update or delete operations exist at this
/// boundary. Retention is an external concern.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgScanRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScanRepository: Send + Sync {
    /// Appends one scan event.
    async fn append(&self, event: NewScanEvent) -> Result<ScanEvent, AppError>;

    /// Counts events for an owner since `since`.
    async fn count_by_owner_since(
        &self,
        owner_id: i64,
        since: DateTime<Utc>,
    ) -> Result<i64, AppError>;

    /// Counts events for one record since `since`.
    async fn count_by_record_since(
        &self,
        qr_record_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<i64, AppError>;

    /// Daily event counts in ascending day order.
    async fn count_by_day(
        &self,
        scope: ScanScope,
        since: DateTime<Utc>,
    ) -> Result<Vec<DayCount>, AppError>;

    /// Top countries by event count, descending.
    async fn count_by_country(
        &self,
        owner_id: i64,
        since: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<FieldCount>, AppError>;

    /// Event counts per device type, descending.
    async fn count_by_device(
        &self,
        owner_id: i64,
        since: DateTime<Utc>,
    ) -> Result<Vec<FieldCount>, AppError>;

    /// Most recent events for a record, newest first.
    async fn recent_by_record(
        &self,
        qr_record_id: Uuid,
        since: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<ScanEvent>, AppError>;
}
