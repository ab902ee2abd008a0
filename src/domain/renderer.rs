//! Image renderer collaborator interface.

use crate::domain::entities::Customization;
use crate::error::AppError;

/// External collaborator turning a payload string into a QR image.
///
/// The core never interprets the customization struct itself; it is handed
/// through verbatim.
///
/// # Implementations
///
/// - [`crate::infrastructure::render::SvgQrRenderer`] - SVG data-URL renderer
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
pub trait QrRenderer: Send + Sync {
    /// Encodes `data` into a QR image, returning its storable location
    /// (a data URL).
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] when the payload cannot be encoded
    /// (too large for the requested error-correction level). The payload is
    /// assembled by the service, so an encoding failure is never the
    /// client's fault.
    fn render(&self, data: &str, customization: &Customization) -> Result<String, AppError>;
}
