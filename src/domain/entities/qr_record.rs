//! QR record entity: a short code bound to a destination URL.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

/// QR error-correction level, as understood by the image renderer.
///
/// Stored as a single-letter text column (`L`/`M`/`Q`/`H`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EcLevel {
    L,
    M,
    Q,
    H,
}

impl EcLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::L => "L",
            Self::M => "M",
            Self::Q => "Q",
            Self::H => "H",
        }
    }
}

impl Default for EcLevel {
    fn default() -> Self {
        Self::M
    }
}

#[derive(Debug, Error)]
#[error("invalid error-correction level: {0}")]
pub struct ParseEcLevelError(String);

impl TryFrom<String> for EcLevel {
    type Error = ParseEcLevelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "L" => Ok(Self::L),
            "M" => Ok(Self::M),
            "Q" => Ok(Self::Q),
            "H" => Ok(Self::H),
            other => Err(ParseEcLevelError(other.to_string())),
        }
    }
}

/// Rendering hints for the QR image.
///
/// Opaque to the resolution core; only the renderer interprets these.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Customization {
    pub fg_color: String,
    pub bg_color: String,
    pub size: i32,
    #[sqlx(try_from = "String")]
    pub ec_level: EcLevel,
}

impl Default for Customization {
    fn default() -> Self {
        Self {
            fg_color: "#000000".to_string(),
            bg_color: "#ffffff".to_string(),
            size: 200,
            ec_level: EcLevel::M,
        }
    }
}

/// A QR record with its immutable short code and mutable destination.
///
/// `scan_count` is only ever incremented, and only by the redirect resolver.
/// `is_active == false` marks a soft-deleted record: excluded from listings
/// and from public resolution, but retained for historical analytics.
#[derive(Debug, Clone, FromRow)]
pub struct QrRecord {
    pub id: Uuid,
    pub owner_id: i64,
    pub title: String,
    pub destination_url: String,
    pub short_code: String,
    #[sqlx(flatten)]
    pub customization: Customization,
    /// Rendered QR image as a base64 data URL.
    pub qr_image: String,
    pub scan_count: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new QR record.
///
/// The short code is assigned by the allocator before the record is
/// persisted; record creation including its code is a single INSERT.
#[derive(Debug, Clone)]
pub struct NewQrRecord {
    pub id: Uuid,
    pub owner_id: i64,
    pub title: String,
    pub destination_url: String,
    pub short_code: String,
    pub customization: Customization,
    pub qr_image: String,
}

/// Partial update for an existing QR record.
///
/// `None` fields are left unchanged. The short code and owner are immutable
/// and deliberately absent.
#[derive(Debug, Clone, Default)]
pub struct QrPatch {
    pub title: Option<String>,
    pub destination_url: Option<String>,
    pub customization: Option<Customization>,
    pub qr_image: Option<String>,
}
