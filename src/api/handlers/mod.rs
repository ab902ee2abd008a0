//! HTTP request handlers.

pub mod analytics;
pub mod health;
pub mod qr;
pub mod redirect;

pub use analytics::{dashboard_handler, qr_analytics_handler};
pub use health::health_handler;
pub use qr::{
    create_qr_handler, delete_qr_handler, get_qr_handler, list_qr_handler, update_qr_handler,
};
pub use redirect::redirect_handler;
