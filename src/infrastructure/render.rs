//! SVG QR image rendering.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use qrcode::render::svg;
use qrcode::{EcLevel as QrEcLevel, QrCode};
use serde_json::json;

use crate::domain::entities::{Customization, EcLevel};
use crate::domain::renderer::QrRenderer;
use crate::error::AppError;

const MIN_SIZE: u32 = 64;
const MAX_SIZE: u32 = 1024;

/// Renders QR codes as base64 data URLs wrapping an SVG document.
///
/// SVG keeps the stored image resolution-independent; the `size` field only
/// sets the document's nominal dimensions. Stored once at record creation
/// and re-rendered on update, never on the redirect path.
pub struct SvgQrRenderer;

impl SvgQrRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SvgQrRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn ec_level(level: EcLevel) -> QrEcLevel {
    match level {
        EcLevel::L => QrEcLevel::L,
        EcLevel::M => QrEcLevel::M,
        EcLevel::Q => QrEcLevel::Q,
        EcLevel::H => QrEcLevel::H,
    }
}

impl QrRenderer for SvgQrRenderer {
    fn render(&self, data: &str, customization: &Customization) -> Result<String, AppError> {
        let code = QrCode::with_error_correction_level(
            data.as_bytes(),
            ec_level(customization.ec_level),
        )
        .map_err(|e| {
            // The payload is the server-built scan URL, not client input.
            AppError::internal(
                "Failed to encode QR payload",
                json!({ "reason": e.to_string() }),
            )
        })?;

        let size = (customization.size.max(0) as u32).clamp(MIN_SIZE, MAX_SIZE);

        let image = code
            .render::<svg::Color>()
            .min_dimensions(size, size)
            .dark_color(svg::Color(&customization.fg_color))
            .light_color(svg::Color(&customization.bg_color))
            .build();

        Ok(format!(
            "data:image/svg+xml;base64,{}",
            STANDARD.encode(image.as_bytes())
        ))
    }
}
