//! Application services.

pub mod analytics_service;
pub mod auth_service;
pub mod qr_service;
pub mod redirect_service;

pub use analytics_service::{AnalyticsService, DashboardStats, QrAnalytics};
pub use auth_service::AuthService;
pub use qr_service::{CreateQrInput, CustomizationPatch, QrService, UpdateQrInput};
pub use redirect_service::RedirectService;
