//! PostgreSQL implementation of the QR record repository.

use async_trait::async_trait;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{NewQrRecord, QrPatch, QrRecord};
use crate::domain::repositories::QrRepository;
use crate::error::AppError;

const RECORD_COLUMNS: &str = "id, owner_id, title, destination_url, short_code, \
     fg_color, bg_color, size, ec_level, qr_image, scan_count, is_active, \
     created_at, updated_at";

/// PostgreSQL repository for QR records.
///
/// The `short_code` unique constraint enforced here is the authoritative
/// guard for allocation races; `create` maps its violation to
/// [`AppError::Conflict`] so the allocator can retry.
pub struct PgQrRepository {
    pool: Arc<PgPool>,
}

impl PgQrRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QrRepository for PgQrRepository {
    async fn create(&self, new_record: NewQrRecord) -> Result<QrRecord, AppError> {
        let sql = format!(
            "INSERT INTO qr_records \
             (id, owner_id, title, destination_url, short_code, fg_color, bg_color, size, ec_level, qr_image) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {RECORD_COLUMNS}"
        );

        let record = sqlx::query_as::<_, QrRecord>(&sql)
            .bind(new_record.id)
            .bind(new_record.owner_id)
            .bind(&new_record.title)
            .bind(&new_record.destination_url)
            .bind(&new_record.short_code)
            .bind(&new_record.customization.fg_color)
            .bind(&new_record.customization.bg_color)
            .bind(new_record.customization.size)
            .bind(new_record.customization.ec_level.as_str())
            .bind(&new_record.qr_image)
            .fetch_one(self.pool.as_ref())
            .await
            .map_err(|e| match AppError::from(e) {
                AppError::Conflict { details, .. } => AppError::conflict(
                    "Short code already allocated",
                    json!({ "short_code": new_record.short_code, "constraint": details["constraint"] }),
                ),
                other => other,
            })?;

        Ok(record)
    }

    async fn find_by_short_code(&self, code: &str) -> Result<Option<QrRecord>, AppError> {
        let sql = format!("SELECT {RECORD_COLUMNS} FROM qr_records WHERE short_code = $1");

        let record = sqlx::query_as::<_, QrRecord>(&sql)
            .bind(code)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(record)
    }

    async fn find_active_by_short_code(&self, code: &str) -> Result<Option<QrRecord>, AppError> {
        let sql = format!(
            "SELECT {RECORD_COLUMNS} FROM qr_records WHERE short_code = $1 AND is_active = TRUE"
        );

        let record = sqlx::query_as::<_, QrRecord>(&sql)
            .bind(code)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(record)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<QrRecord>, AppError> {
        let sql = format!("SELECT {RECORD_COLUMNS} FROM qr_records WHERE id = $1");

        let record = sqlx::query_as::<_, QrRecord>(&sql)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(record)
    }

    async fn list_by_owner(
        &self,
        owner_id: i64,
        active_only: bool,
    ) -> Result<Vec<QrRecord>, AppError> {
        let sql = format!(
            "SELECT {RECORD_COLUMNS} FROM qr_records \
             WHERE owner_id = $1 AND ($2 = FALSE OR is_active = TRUE) \
             ORDER BY created_at DESC"
        );

        let records = sqlx::query_as::<_, QrRecord>(&sql)
            .bind(owner_id)
            .bind(active_only)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(records)
    }

    async fn count_active_by_owner(&self, owner_id: i64) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM qr_records WHERE owner_id = $1 AND is_active = TRUE",
        )
        .bind(owner_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count)
    }

    async fn increment_scan_count(&self, id: Uuid) -> Result<bool, AppError> {
        // Single atomic increment in SQL; concurrent scans must not lose
        // updates, so this is never read-modify-write at the application
        // level.
        let result = sqlx::query("UPDATE qr_records SET scan_count = scan_count + 1 WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn update(&self, id: Uuid, patch: QrPatch) -> Result<QrRecord, AppError> {
        let sql = format!(
            "UPDATE qr_records SET \
                title = COALESCE($2, title), \
                destination_url = COALESCE($3, destination_url), \
                fg_color = COALESCE($4, fg_color), \
                bg_color = COALESCE($5, bg_color), \
                size = COALESCE($6, size), \
                ec_level = COALESCE($7, ec_level), \
                qr_image = COALESCE($8, qr_image), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {RECORD_COLUMNS}"
        );

        let customization = patch.customization.as_ref();

        let record = sqlx::query_as::<_, QrRecord>(&sql)
            .bind(id)
            .bind(patch.title.as_deref())
            .bind(patch.destination_url.as_deref())
            .bind(customization.map(|c| c.fg_color.as_str()))
            .bind(customization.map(|c| c.bg_color.as_str()))
            .bind(customization.map(|c| c.size))
            .bind(customization.map(|c| c.ec_level.as_str()))
            .bind(patch.qr_image.as_deref())
            .fetch_optional(self.pool.as_ref())
            .await?;

        record.ok_or_else(|| AppError::not_found("QR record not found", json!({ "id": id })))
    }

    async fn soft_delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE qr_records SET is_active = FALSE, updated_at = NOW() \
             WHERE id = $1 AND is_active = TRUE",
        )
        .bind(id)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
