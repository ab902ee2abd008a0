//! DTOs for analytics endpoints.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::services::{DashboardStats, QrAnalytics};
use crate::domain::entities::ScanEvent;
use crate::domain::repositories::{DayCount, FieldCount};

/// Query parameters shared by the analytics endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct PeriodQuery {
    /// Time window in days, clamped server-side to 1-365. Default 30.
    pub period: Option<i64>,
}

/// One day of scan activity (UTC bucketing).
#[derive(Debug, Serialize)]
pub struct DayCountDto {
    pub day: NaiveDate,
    pub count: i64,
}

impl From<DayCount> for DayCountDto {
    fn from(d: DayCount) -> Self {
        Self {
            day: d.day,
            count: d.count,
        }
    }
}

/// Scans grouped by one metadata value; `value` is null for events that
/// were never enriched.
#[derive(Debug, Serialize)]
pub struct FieldCountDto {
    pub value: Option<String>,
    pub count: i64,
}

impl From<FieldCount> for FieldCountDto {
    fn from(f: FieldCount) -> Self {
        Self {
            value: f.value,
            count: f.count,
        }
    }
}

/// Compact record listing inside the dashboard's top-5.
#[derive(Debug, Serialize)]
pub struct QrSummaryDto {
    pub id: Uuid,
    pub title: String,
    pub short_code: String,
    pub scan_count: i64,
}

/// Response body for `GET /api/analytics/dashboard`.
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub total_qr_records: i64,
    pub total_scans: i64,
    pub scans_by_day: Vec<DayCountDto>,
    pub top_records: Vec<QrSummaryDto>,
    pub top_countries: Vec<FieldCountDto>,
    pub devices: Vec<FieldCountDto>,
}

impl From<DashboardStats> for DashboardResponse {
    fn from(stats: DashboardStats) -> Self {
        Self {
            total_qr_records: stats.total_qr_records,
            total_scans: stats.total_scans,
            scans_by_day: stats.scans_by_day.into_iter().map(Into::into).collect(),
            top_records: stats
                .top_records
                .into_iter()
                .map(|r| QrSummaryDto {
                    id: r.id,
                    title: r.title,
                    short_code: r.short_code,
                    scan_count: r.scan_count,
                })
                .collect(),
            top_countries: stats.top_countries.into_iter().map(Into::into).collect(),
            devices: stats.devices.into_iter().map(Into::into).collect(),
        }
    }
}

/// One scan event in a per-record listing.
#[derive(Debug, Serialize)]
pub struct ScanEventDto {
    pub occurred_at: DateTime<Utc>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub device_type: Option<String>,
    pub browser: Option<String>,
    pub os: Option<String>,
    pub referrer: Option<String>,
}

impl From<ScanEvent> for ScanEventDto {
    fn from(e: ScanEvent) -> Self {
        Self {
            occurred_at: e.occurred_at,
            country: e.country,
            city: e.city,
            region: e.region,
            device_type: e.device_type,
            browser: e.browser,
            os: e.os,
            referrer: e.referrer,
        }
    }
}

/// Response body for `GET /api/analytics/qr/{id}`.
#[derive(Debug, Serialize)]
pub struct QrAnalyticsResponse {
    pub id: Uuid,
    pub title: String,
    pub short_code: String,
    /// Lifetime counter maintained by the redirect path.
    pub scan_count: i64,
    /// Scans inside the requested window, from the event log.
    pub total_scans: i64,
    pub scans_by_day: Vec<DayCountDto>,
    pub recent_scans: Vec<ScanEventDto>,
}

impl From<QrAnalytics> for QrAnalyticsResponse {
    fn from(analytics: QrAnalytics) -> Self {
        Self {
            id: analytics.record.id,
            title: analytics.record.title,
            short_code: analytics.record.short_code,
            scan_count: analytics.record.scan_count,
            total_scans: analytics.total_scans,
            scans_by_day: analytics.scans_by_day.into_iter().map(Into::into).collect(),
            recent_scans: analytics.recent_scans.into_iter().map(Into::into).collect(),
        }
    }
}
