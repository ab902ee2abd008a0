//! Handlers for analytics endpoints.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use uuid::Uuid;

use crate::api::dto::analytics::{DashboardResponse, PeriodQuery, QrAnalyticsResponse};
use crate::domain::entities::Account;
use crate::error::AppError;
use crate::state::AppState;

/// Account-wide scan analytics.
///
/// # Endpoint
///
/// `GET /api/analytics/dashboard?period=30`
///
/// Totals, a daily series, the top 5 records by lifetime scans, and
/// country/device breakdowns, all within the requested window.
pub async fn dashboard_handler(
    State(state): State<AppState>,
    Extension(account): Extension<Account>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<DashboardResponse>, AppError> {
    let stats = state
        .analytics_service
        .dashboard(&account, query.period)
        .await?;

    Ok(Json(stats.into()))
}

/// Per-record scan analytics with the 100 most recent events.
///
/// # Endpoint
///
/// `GET /api/analytics/qr/{id}?period=30`
///
/// # Errors
///
/// Returns 404 Not Found for an unknown record, 401 Unauthorized for a
/// record owned by another account.
pub async fn qr_analytics_handler(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Extension(account): Extension<Account>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<QrAnalyticsResponse>, AppError> {
    let analytics = state
        .analytics_service
        .qr_analytics(&account, id, query.period)
        .await?;

    Ok(Json(analytics.into()))
}
