//! Handler for public short-code resolution.

use axum::{
    extract::{ConnectInfo, Path, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Redirect},
};
use std::net::SocketAddr;

use crate::domain::scan_message::{GeoHint, ScanMessage};
use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its destination URL.
///
/// # Endpoint
///
/// `GET /r/{code}` (public, rate-limited per IP)
///
/// # Request Flow
///
/// 1. Resolve the code (active records only); the scan counter is bumped
///    inline by the service
/// 2. Capture client metadata and edge-proxy geo headers
/// 3. Hand the scan event to the background worker, fire-and-forget
/// 4. Return 307 Temporary Redirect
///
/// The redirect never waits for event persistence; a full queue drops the
/// event while the counter was already incremented.
///
/// # Errors
///
/// Returns 404 Not Found for unknown and soft-deleted codes alike.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<impl IntoResponse, AppError> {
    let record = state.redirect_service.resolve(&code).await?;

    let geo_hint = GeoHint {
        country: header_string(&headers, "cf-ipcountry"),
        city: header_string(&headers, "x-geo-city"),
        region: header_string(&headers, "x-geo-region"),
    };

    let message = ScanMessage::new(
        record.id,
        record.owner_id,
        Some(addr.ip().to_string()),
        headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok()),
        headers.get(header::REFERER).and_then(|v| v.to_str().ok()),
        geo_hint,
    );

    state.redirect_service.enqueue_scan(message);

    Ok(Redirect::temporary(&record.destination_url))
}

fn header_string(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}
