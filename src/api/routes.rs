//! API route configuration.
//!
//! All API endpoints require Bearer token authentication via
//! [`crate::api::middleware::auth`].

use crate::api::handlers::{
    create_qr_handler, dashboard_handler, delete_qr_handler, get_qr_handler, list_qr_handler,
    qr_analytics_handler, update_qr_handler,
};
use crate::state::AppState;
use axum::{
    routing::get,
    Router,
};

/// All API routes, protected by Bearer token authentication.
///
/// # Endpoints
///
/// - `GET    /qr`                    - List the caller's QR records
/// - `POST   /qr`                    - Create a QR record
/// - `GET    /qr/{id}`               - Fetch one record
/// - `PATCH  /qr/{id}`               - Partially update a record
/// - `DELETE /qr/{id}`               - Soft-delete a record
/// - `GET    /analytics/dashboard`   - Account-wide scan analytics
/// - `GET    /analytics/qr/{id}`     - Per-record scan analytics
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/qr", get(list_qr_handler).post(create_qr_handler))
        .route(
            "/qr/{id}",
            get(get_qr_handler)
                .patch(update_qr_handler)
                .delete(delete_qr_handler),
        )
        .route("/analytics/dashboard", get(dashboard_handler))
        .route("/analytics/qr/{id}", get(qr_analytics_handler))
}
