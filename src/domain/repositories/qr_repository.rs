//! Repository trait for QR record data access.

use crate::domain::entities::{NewQrRecord, QrPatch, QrRecord};
use crate::error::AppError;
use async_trait::async_trait;
use uuid::Uuid;

/// Repository interface for QR record persistence.
///
/// The implementation must enforce a uniqueness constraint on `short_code`
/// spanning active and inactive records; it is the authoritative guard
/// against allocation races, the allocator's existence pre-check is only an
/// optimization.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgQrRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QrRepository: Send + Sync {
    /// Persists a new QR record with its pre-assigned short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the short code already exists
    /// (lost allocation race; the caller retries allocation).
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_record: NewQrRecord) -> Result<QrRecord, AppError>;

    /// Finds a record by short code, active or not. Exact, case-sensitive
    /// match.
    async fn find_by_short_code(&self, code: &str) -> Result<Option<QrRecord>, AppError>;

    /// Finds a record by short code only if it is active.
    ///
    /// Used by the public resolver: inactive codes must look identical to
    /// codes that were never allocated.
    async fn find_active_by_short_code(&self, code: &str) -> Result<Option<QrRecord>, AppError>;

    /// Finds a record by id regardless of owner or active flag.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<QrRecord>, AppError>;

    /// Lists an owner's records in reverse-creation order.
    ///
    /// With `active_only`, soft-deleted records are excluded.
    async fn list_by_owner(
        &self,
        owner_id: i64,
        active_only: bool,
    ) -> Result<Vec<QrRecord>, AppError>;

    /// Counts an owner's active records, for plan quota checks.
    async fn count_active_by_owner(&self, owner_id: i64) -> Result<i64, AppError>;

    /// Atomically increments `scan_count` by 1.
    ///
    /// Must be a single SQL increment, never an application-level
    /// read-modify-write; concurrent scans of the same record must not lose
    /// updates. Returns `false` if no row matched.
    async fn increment_scan_count(&self, id: Uuid) -> Result<bool, AppError>;

    /// Partially updates a record. `None` fields are unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record matches `id`.
    async fn update(&self, id: Uuid, patch: QrPatch) -> Result<QrRecord, AppError>;

    /// Soft-deletes a record by clearing `is_active`.
    ///
    /// Returns `true` if an active record was found and deactivated,
    /// `false` if the record is missing or already inactive. The row itself
    /// is never removed.
    async fn soft_delete(&self, id: Uuid) -> Result<bool, AppError>;
}
