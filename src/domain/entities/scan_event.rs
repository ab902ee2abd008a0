//! Scan event entity: one recorded resolution of a short code.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// A persisted scan event.
///
/// Written exactly once per successful resolution and never mutated.
/// All client metadata is best-effort: missing headers or failed enrichment
/// leave the corresponding fields `NULL` without failing the record.
#[derive(Debug, Clone, FromRow)]
pub struct ScanEvent {
    pub id: i64,
    pub qr_record_id: Uuid,
    pub owner_id: i64,
    pub occurred_at: DateTime<Utc>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub device_type: Option<String>,
    pub browser: Option<String>,
    pub os: Option<String>,
}

/// Input for appending a scan event to the log.
#[derive(Debug, Clone, Default)]
pub struct NewScanEvent {
    pub qr_record_id: Uuid,
    pub owner_id: i64,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub device_type: Option<String>,
    pub browser: Option<String>,
    pub os: Option<String>,
}
