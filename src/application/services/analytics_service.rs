//! Owner-facing scan analytics.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use uuid::Uuid;

use crate::domain::entities::{Account, QrRecord, ScanEvent};
use crate::domain::repositories::{DayCount, FieldCount, QrRepository, ScanRepository, ScanScope};
use crate::error::AppError;

const TOP_RECORDS_LIMIT: usize = 5;
const TOP_COUNTRIES_LIMIT: i64 = 10;
const RECENT_SCANS_LIMIT: i64 = 100;
const MAX_PERIOD_DAYS: i64 = 365;
const DEFAULT_PERIOD_DAYS: i64 = 30;

/// Account-wide dashboard aggregates for one time window.
#[derive(Debug, Clone)]
pub struct DashboardStats {
    pub total_qr_records: i64,
    pub total_scans: i64,
    pub scans_by_day: Vec<DayCount>,
    pub top_records: Vec<QrRecord>,
    pub top_countries: Vec<FieldCount>,
    pub devices: Vec<FieldCount>,
}

/// Per-record analytics for one time window.
#[derive(Debug, Clone)]
pub struct QrAnalytics {
    pub record: QrRecord,
    pub total_scans: i64,
    pub scans_by_day: Vec<DayCount>,
    pub recent_scans: Vec<ScanEvent>,
}

/// Service aggregating the scan event log for owners.
///
/// All queries are owner-scoped; per-record queries repeat the ownership
/// check instead of trusting the caller.
pub struct AnalyticsService<Q: QrRepository, S: ScanRepository> {
    qr_repository: Arc<Q>,
    scan_repository: Arc<S>,
}

impl<Q: QrRepository, S: ScanRepository> AnalyticsService<Q, S> {
    pub fn new(qr_repository: Arc<Q>, scan_repository: Arc<S>) -> Self {
        Self {
            qr_repository,
            scan_repository,
        }
    }

    /// Account dashboard: totals, daily series, top records, countries,
    /// devices, all within the last `period_days` days.
    ///
    /// `period_days` is clamped to `1..=365`; `None` means 30 days.
    pub async fn dashboard(
        &self,
        owner: &Account,
        period_days: Option<i64>,
    ) -> Result<DashboardStats, AppError> {
        let since = window_start(period_days);

        let total_qr_records = self.qr_repository.count_active_by_owner(owner.id).await?;
        let total_scans = self
            .scan_repository
            .count_by_owner_since(owner.id, since)
            .await?;
        let scans_by_day = self
            .scan_repository
            .count_by_day(ScanScope::Owner(owner.id), since)
            .await?;
        let top_countries = self
            .scan_repository
            .count_by_country(owner.id, since, TOP_COUNTRIES_LIMIT)
            .await?;
        let devices = self.scan_repository.count_by_device(owner.id, since).await?;

        // Lifetime counters, not window-scoped: the dashboard's "top" list
        // answers which codes matter overall.
        let mut records = self.qr_repository.list_by_owner(owner.id, true).await?;
        records.sort_by(|a, b| b.scan_count.cmp(&a.scan_count));
        records.truncate(TOP_RECORDS_LIMIT);

        Ok(DashboardStats {
            total_qr_records,
            total_scans,
            scans_by_day,
            top_records: records,
            top_countries,
            devices,
        })
    }

    /// Per-record analytics with recent scans, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for an unknown record and
    /// [`AppError::Unauthorized`] for a record owned by someone else.
    pub async fn qr_analytics(
        &self,
        owner: &Account,
        id: Uuid,
        period_days: Option<i64>,
    ) -> Result<QrAnalytics, AppError> {
        let record = self
            .qr_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("QR record not found", json!({ "id": id })))?;

        if record.owner_id != owner.id {
            return Err(AppError::unauthorized(
                "QR record belongs to another account",
                json!({ "id": id }),
            ));
        }

        let since = window_start(period_days);

        let total_scans = self
            .scan_repository
            .count_by_record_since(id, since)
            .await?;
        let scans_by_day = self
            .scan_repository
            .count_by_day(ScanScope::Record(id), since)
            .await?;
        let recent_scans = self
            .scan_repository
            .recent_by_record(id, since, RECENT_SCANS_LIMIT)
            .await?;

        Ok(QrAnalytics {
            record,
            total_scans,
            scans_by_day,
            recent_scans,
        })
    }
}

fn window_start(period_days: Option<i64>) -> DateTime<Utc> {
    let days = period_days
        .unwrap_or(DEFAULT_PERIOD_DAYS)
        .clamp(1, MAX_PERIOD_DAYS);
    Utc::now() - Duration::days(days)
}
