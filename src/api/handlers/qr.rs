//! Handlers for QR record management endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::api::dto::qr::{
    CreateQrRequest, ListQrQuery, QrListResponse, QrResponse, UpdateQrRequest,
};
use crate::domain::entities::Account;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a QR record with a freshly allocated short code.
///
/// # Endpoint
///
/// `POST /api/qr`
///
/// # Request Body
///
/// ```json
/// {
///   "title": "Lunch menu",
///   "destination_url": "https://example.com/menu",
///   "customization": {
///     "foreground_color": "#1a2b3c",
///     "size": 400,
///     "error_correction": "Q"
///   }
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request on validation failure, 403 Forbidden when the
/// account's plan quota is exhausted.
pub async fn create_qr_handler(
    State(state): State<AppState>,
    Extension(account): Extension<Account>,
    Json(payload): Json<CreateQrRequest>,
) -> Result<(StatusCode, Json<QrResponse>), AppError> {
    payload.validate()?;

    let record = state
        .qr_service
        .create(&account, payload.into_input())
        .await?;

    let scan_url = state.qr_service.scan_url(&record.short_code);

    Ok((
        StatusCode::CREATED,
        Json(QrResponse::from_record(record, scan_url)),
    ))
}

/// Lists the caller's QR records, newest first.
///
/// # Endpoint
///
/// `GET /api/qr?include_inactive=true`
///
/// Soft-deleted records are hidden unless `include_inactive` is set.
pub async fn list_qr_handler(
    State(state): State<AppState>,
    Extension(account): Extension<Account>,
    Query(query): Query<ListQrQuery>,
) -> Result<Json<QrListResponse>, AppError> {
    let records = state
        .qr_service
        .list(account.id, query.include_inactive)
        .await?;

    let items: Vec<QrResponse> = records
        .into_iter()
        .map(|r| {
            let scan_url = state.qr_service.scan_url(&r.short_code);
            QrResponse::from_record(r, scan_url)
        })
        .collect();

    Ok(Json(QrListResponse {
        total: items.len(),
        items,
    }))
}

/// Fetches a single owned QR record.
///
/// # Endpoint
///
/// `GET /api/qr/{id}`
///
/// # Errors
///
/// Returns 404 Not Found for an unknown id, 401 Unauthorized for a record
/// owned by another account.
pub async fn get_qr_handler(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Extension(account): Extension<Account>,
) -> Result<Json<QrResponse>, AppError> {
    let record = state.qr_service.get_owned(&account, id).await?;
    let scan_url = state.qr_service.scan_url(&record.short_code);

    Ok(Json(QrResponse::from_record(record, scan_url)))
}

/// Partially updates an owned QR record.
///
/// # Endpoint
///
/// `PATCH /api/qr/{id}`
///
/// Only provided fields are changed; the short code is immutable. Changing
/// the destination re-points the existing printed code, while changing the
/// customization re-renders the stored image.
///
/// # Errors
///
/// Returns 400 Bad Request for an empty patch or validation failure,
/// 404/401 as for [`get_qr_handler`].
pub async fn update_qr_handler(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Extension(account): Extension<Account>,
    Json(payload): Json<UpdateQrRequest>,
) -> Result<Json<QrResponse>, AppError> {
    payload.validate()?;

    let record = state
        .qr_service
        .update(&account, id, payload.into_input()?)
        .await?;

    let scan_url = state.qr_service.scan_url(&record.short_code);

    Ok(Json(QrResponse::from_record(record, scan_url)))
}

/// Soft-deletes an owned QR record.
///
/// # Endpoint
///
/// `DELETE /api/qr/{id}`
///
/// The record is deactivated, never removed: its code stops resolving
/// publicly but history stays available with `include_inactive`.
pub async fn delete_qr_handler(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Extension(account): Extension<Account>,
) -> Result<StatusCode, AppError> {
    state.qr_service.delete(&account, id).await?;

    Ok(StatusCode::NO_CONTENT)
}
