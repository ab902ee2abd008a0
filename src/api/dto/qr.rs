//! DTOs for QR record management endpoints.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::application::services::{CreateQrInput, CustomizationPatch, UpdateQrInput};
use crate::domain::entities::{Customization, EcLevel, QrRecord};
use crate::error::AppError;

static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("valid regex"));

/// QR appearance options. Every field is optional; absent fields fall back
/// to the defaults (black on white, 200px, level M) on create, and to the
/// stored values on update.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CustomizationDto {
    #[validate(regex(path = *HEX_COLOR, message = "Expected a #rrggbb color"))]
    pub foreground_color: Option<String>,

    #[validate(regex(path = *HEX_COLOR, message = "Expected a #rrggbb color"))]
    pub background_color: Option<String>,

    /// Nominal image dimension in pixels.
    #[validate(range(min = 64, max = 1024))]
    pub size: Option<i32>,

    /// QR error-correction level: `L`, `M`, `Q` or `H`.
    pub error_correction: Option<EcLevel>,
}

impl CustomizationDto {
    pub fn into_customization(self) -> Customization {
        let defaults = Customization::default();
        Customization {
            fg_color: self.foreground_color.unwrap_or(defaults.fg_color),
            bg_color: self.background_color.unwrap_or(defaults.bg_color),
            size: self.size.unwrap_or(defaults.size),
            ec_level: self.error_correction.unwrap_or(defaults.ec_level),
        }
    }

    pub fn into_patch(self) -> CustomizationPatch {
        CustomizationPatch {
            fg_color: self.foreground_color,
            bg_color: self.background_color,
            size: self.size,
            ec_level: self.error_correction,
        }
    }
}

/// Request body for `POST /api/qr`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateQrRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(url(message = "Invalid URL format"))]
    pub destination_url: String,

    #[validate(nested)]
    pub customization: Option<CustomizationDto>,
}

impl CreateQrRequest {
    pub fn into_input(self) -> CreateQrInput {
        CreateQrInput {
            title: self.title,
            destination_url: self.destination_url,
            customization: self.customization.map(CustomizationDto::into_customization),
        }
    }
}

/// Request body for `PATCH /api/qr/{id}`.
///
/// All fields are optional; only provided fields are changed. The short code
/// is immutable and has no field here.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateQrRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,

    #[validate(url(message = "Invalid URL format"))]
    pub destination_url: Option<String>,

    #[validate(nested)]
    pub customization: Option<CustomizationDto>,
}

impl UpdateQrRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.destination_url.is_none() && self.customization.is_none()
    }

    pub fn into_input(self) -> Result<UpdateQrInput, AppError> {
        if self.is_empty() {
            return Err(AppError::bad_request(
                "Update request contains no fields",
                json!({}),
            ));
        }

        Ok(UpdateQrInput {
            title: self.title,
            destination_url: self.destination_url,
            customization: self.customization.map(CustomizationDto::into_patch),
        })
    }
}

/// Customization as returned to clients.
#[derive(Debug, Serialize)]
pub struct CustomizationView {
    pub foreground_color: String,
    pub background_color: String,
    pub size: i32,
    pub error_correction: EcLevel,
}

/// JSON representation of a QR record.
#[derive(Debug, Serialize)]
pub struct QrResponse {
    pub id: Uuid,
    pub title: String,
    pub destination_url: String,
    pub short_code: String,
    /// Public URL the printed code resolves through.
    pub scan_url: String,
    /// Rendered image as a base64 SVG data URL.
    pub qr_image: String,
    pub customization: CustomizationView,
    pub scan_count: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl QrResponse {
    pub fn from_record(record: QrRecord, scan_url: String) -> Self {
        Self {
            id: record.id,
            title: record.title,
            destination_url: record.destination_url,
            short_code: record.short_code,
            scan_url,
            qr_image: record.qr_image,
            customization: CustomizationView {
                foreground_color: record.customization.fg_color,
                background_color: record.customization.bg_color,
                size: record.customization.size,
                error_correction: record.customization.ec_level,
            },
            scan_count: record.scan_count,
            is_active: record.is_active,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Response body for `GET /api/qr`.
#[derive(Debug, Serialize)]
pub struct QrListResponse {
    pub total: usize,
    pub items: Vec<QrResponse>,
}

/// Query parameters for `GET /api/qr`.
#[derive(Debug, Default, Deserialize)]
pub struct ListQrQuery {
    /// Include soft-deleted records in the listing.
    #[serde(default)]
    pub include_inactive: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_validation() {
        let valid = CreateQrRequest {
            title: "Menu".to_string(),
            destination_url: "https://example.com/menu".to_string(),
            customization: None,
        };
        assert!(valid.validate().is_ok());

        let bad_url = CreateQrRequest {
            title: "Menu".to_string(),
            destination_url: "not-a-url".to_string(),
            customization: None,
        };
        assert!(bad_url.validate().is_err());

        let empty_title = CreateQrRequest {
            title: String::new(),
            destination_url: "https://example.com".to_string(),
            customization: None,
        };
        assert!(empty_title.validate().is_err());
    }

    #[test]
    fn test_customization_validation() {
        let valid = CustomizationDto {
            foreground_color: Some("#1A2b3C".to_string()),
            background_color: None,
            size: Some(512),
            error_correction: Some(EcLevel::H),
        };
        assert!(valid.validate().is_ok());

        let bad_color = CustomizationDto {
            foreground_color: Some("red".to_string()),
            ..CustomizationDto::default()
        };
        assert!(bad_color.validate().is_err());

        let bad_size = CustomizationDto {
            size: Some(16),
            ..CustomizationDto::default()
        };
        assert!(bad_size.validate().is_err());
    }

    #[test]
    fn test_nested_customization_is_validated() {
        let request = CreateQrRequest {
            title: "Menu".to_string(),
            destination_url: "https://example.com".to_string(),
            customization: Some(CustomizationDto {
                foreground_color: Some("#zzzzzz".to_string()),
                ..CustomizationDto::default()
            }),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_customization_defaults_applied_on_create() {
        let c = CustomizationDto {
            foreground_color: Some("#ff0000".to_string()),
            ..CustomizationDto::default()
        }
        .into_customization();

        assert_eq!(c.fg_color, "#ff0000");
        assert_eq!(c.bg_color, "#ffffff");
        assert_eq!(c.size, 200);
        assert_eq!(c.ec_level, EcLevel::M);
    }

    #[test]
    fn test_empty_update_rejected() {
        assert!(UpdateQrRequest::default().into_input().is_err());
    }
}
