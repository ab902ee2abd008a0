//! Public short-code resolution.

use std::sync::Arc;

use serde_json::json;
use tokio::sync::mpsc;
use tracing::warn;

use crate::domain::entities::QrRecord;
use crate::domain::repositories::QrRepository;
use crate::domain::scan_message::ScanMessage;
use crate::error::AppError;
use crate::utils::short_code::is_short_code_syntax;

/// Service behind `GET /r/{code}`.
///
/// Resolution is an active-only lookup: unknown and soft-deleted codes are
/// indistinguishable to the public. On a hit the scan counter is incremented
/// inline (atomic SQL increment) while the scan event travels through a
/// bounded channel to the background worker. The two writes are independent;
/// neither failure mode cancels the redirect.
pub struct RedirectService<Q: QrRepository> {
    qr_repository: Arc<Q>,
    scan_tx: mpsc::Sender<ScanMessage>,
}

impl<Q: QrRepository> RedirectService<Q> {
    pub fn new(qr_repository: Arc<Q>, scan_tx: mpsc::Sender<ScanMessage>) -> Self {
        Self {
            qr_repository,
            scan_tx,
        }
    }

    /// Resolves a short code to its record and bumps the scan counter.
    ///
    /// The counter bump is best-effort relative to the redirect: a failed
    /// increment is logged and the visitor is still forwarded.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for syntactically invalid, unknown, or
    /// inactive codes.
    pub async fn resolve(&self, code: &str) -> Result<QrRecord, AppError> {
        if !is_short_code_syntax(code) {
            return Err(not_found(code));
        }

        let record = self
            .qr_repository
            .find_active_by_short_code(code)
            .await?
            .ok_or_else(|| not_found(code))?;

        match self.qr_repository.increment_scan_count(record.id).await {
            Ok(true) => {}
            Ok(false) => warn!(qr_record_id = %record.id, "scan counter update matched no row"),
            Err(e) => warn!(qr_record_id = %record.id, error = %e, "scan counter update failed"),
        }

        Ok(record)
    }

    /// Hands a scan event to the background worker, fire-and-forget.
    ///
    /// A full queue drops the event with a warning; the redirect already
    /// happened and must not wait.
    pub fn enqueue_scan(&self, message: ScanMessage) {
        if let Err(e) = self.scan_tx.try_send(message) {
            warn!(error = %e, "scan event dropped, queue unavailable");
        }
    }
}

fn not_found(code: &str) -> AppError {
    AppError::not_found("Short code not found", json!({ "code": code }))
}
