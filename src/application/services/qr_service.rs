//! QR record creation, listing, update, and deletion.

use std::sync::Arc;

use serde_json::json;
use url::Url;
use uuid::Uuid;

use crate::domain::entities::{Account, Customization, EcLevel, NewQrRecord, QrPatch, QrRecord};
use crate::domain::renderer::QrRenderer;
use crate::domain::repositories::QrRepository;
use crate::error::AppError;
use crate::utils::short_code::generate_short_code;

/// Input for creating a QR record. Already past DTO validation; the service
/// still re-checks the destination URL since it is the load-bearing field.
#[derive(Debug, Clone)]
pub struct CreateQrInput {
    pub title: String,
    pub destination_url: String,
    pub customization: Option<Customization>,
}

/// Partial customization update; `None` fields keep their current value.
#[derive(Debug, Clone, Default)]
pub struct CustomizationPatch {
    pub fg_color: Option<String>,
    pub bg_color: Option<String>,
    pub size: Option<i32>,
    pub ec_level: Option<EcLevel>,
}

impl CustomizationPatch {
    fn is_empty(&self) -> bool {
        self.fg_color.is_none()
            && self.bg_color.is_none()
            && self.size.is_none()
            && self.ec_level.is_none()
    }

    fn apply(&self, current: &Customization) -> Customization {
        Customization {
            fg_color: self.fg_color.clone().unwrap_or_else(|| current.fg_color.clone()),
            bg_color: self.bg_color.clone().unwrap_or_else(|| current.bg_color.clone()),
            size: self.size.unwrap_or(current.size),
            ec_level: self.ec_level.unwrap_or(current.ec_level),
        }
    }
}

/// Partial update input for an existing record.
#[derive(Debug, Clone, Default)]
pub struct UpdateQrInput {
    pub title: Option<String>,
    pub destination_url: Option<String>,
    pub customization: Option<CustomizationPatch>,
}

/// Service owning the QR record lifecycle.
///
/// Allocates short codes (bounded retry against the store's unique
/// constraint), renders QR images, enforces plan quotas and ownership.
///
/// The rendered image encodes the public scan URL, not the destination:
/// changing the destination re-points an already-printed code without
/// re-rendering.
pub struct QrService<Q: QrRepository> {
    qr_repository: Arc<Q>,
    renderer: Arc<dyn QrRenderer>,
    public_base_url: String,
}

impl<Q: QrRepository> QrService<Q> {
    pub fn new(qr_repository: Arc<Q>, renderer: Arc<dyn QrRenderer>, public_base_url: String) -> Self {
        Self {
            qr_repository,
            renderer,
            public_base_url,
        }
    }

    /// The public URL a printed QR code resolves through.
    pub fn scan_url(&self, code: &str) -> String {
        format!("{}/r/{}", self.public_base_url.trim_end_matches('/'), code)
    }

    /// Creates a QR record with a freshly allocated short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for an invalid destination URL,
    /// [`AppError::Forbidden`] when the owner's plan quota is exhausted, and
    /// [`AppError::Internal`] if code allocation keeps colliding.
    pub async fn create(&self, owner: &Account, input: CreateQrInput) -> Result<QrRecord, AppError> {
        validate_destination_url(&input.destination_url)?;

        // Count-then-insert is deliberately not transactional; a concurrent
        // create can overshoot the quota by one. Plans tolerate that.
        if let Some(limit) = owner.plan.qr_limit() {
            let active = self.qr_repository.count_active_by_owner(owner.id).await?;
            if active >= limit {
                return Err(AppError::forbidden(
                    "Active QR record limit reached for plan",
                    json!({
                        "reason": "plan_limit_reached",
                        "plan": owner.plan.as_str(),
                        "limit": limit,
                    }),
                ));
            }
        }

        let customization = input.customization.unwrap_or_default();

        self.allocate_and_create(owner.id, &input.title, &input.destination_url, customization)
            .await
    }

    /// Lists the owner's records, newest first.
    pub async fn list(&self, owner_id: i64, include_inactive: bool) -> Result<Vec<QrRecord>, AppError> {
        self.qr_repository
            .list_by_owner(owner_id, !include_inactive)
            .await
    }

    /// Fetches a record the caller must own.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for an unknown id and
    /// [`AppError::Unauthorized`] for a record owned by someone else.
    pub async fn get_owned(&self, owner: &Account, id: Uuid) -> Result<QrRecord, AppError> {
        let record = self
            .qr_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("QR record not found", json!({ "id": id })))?;

        if record.owner_id != owner.id {
            return Err(AppError::unauthorized(
                "QR record belongs to another account",
                json!({ "id": id }),
            ));
        }

        Ok(record)
    }

    /// Partially updates an owned record.
    ///
    /// The short code and owner are immutable. The image is re-rendered only
    /// when the customization changes; a new destination URL re-points the
    /// existing image.
    pub async fn update(
        &self,
        owner: &Account,
        id: Uuid,
        input: UpdateQrInput,
    ) -> Result<QrRecord, AppError> {
        let record = self.get_owned(owner, id).await?;

        if let Some(url) = input.destination_url.as_deref() {
            validate_destination_url(url)?;
        }

        let customization = match input.customization {
            Some(patch) if !patch.is_empty() => Some(patch.apply(&record.customization)),
            _ => None,
        };

        let qr_image = match customization.as_ref() {
            Some(c) => Some(self.renderer.render(&self.scan_url(&record.short_code), c)?),
            None => None,
        };

        self.qr_repository
            .update(
                id,
                QrPatch {
                    title: input.title,
                    destination_url: input.destination_url,
                    customization,
                    qr_image,
                },
            )
            .await
    }

    /// Soft-deletes an owned record. Idempotent: deleting an already
    /// inactive record succeeds without effect.
    pub async fn delete(&self, owner: &Account, id: Uuid) -> Result<(), AppError> {
        self.get_owned(owner, id).await?;
        self.qr_repository.soft_delete(id).await?;
        Ok(())
    }

    /// Picks a free code and inserts the record, retrying on lost races.
    ///
    /// The pre-check is an optimization only; the unique constraint decides.
    async fn allocate_and_create(
        &self,
        owner_id: i64,
        title: &str,
        destination_url: &str,
        customization: Customization,
    ) -> Result<QrRecord, AppError> {
        const MAX_ATTEMPTS: usize = 10;

        for _ in 0..MAX_ATTEMPTS {
            let code = generate_short_code();

            if self.qr_repository.find_by_short_code(&code).await?.is_some() {
                continue;
            }

            let qr_image = self.renderer.render(&self.scan_url(&code), &customization)?;

            let new_record = NewQrRecord {
                id: Uuid::new_v4(),
                owner_id,
                title: title.to_string(),
                destination_url: destination_url.to_string(),
                short_code: code,
                customization: customization.clone(),
                qr_image,
            };

            match self.qr_repository.create(new_record).await {
                Ok(record) => return Ok(record),
                Err(AppError::Conflict { .. }) => continue,
                Err(e) => return Err(e),
            }
        }

        Err(AppError::internal(
            "Failed to allocate a unique short code",
            json!({ "attempts": MAX_ATTEMPTS }),
        ))
    }
}

/// Destination URLs must be absolute http(s) URLs with a host.
fn validate_destination_url(raw: &str) -> Result<(), AppError> {
    let url = Url::parse(raw).map_err(|e| {
        AppError::bad_request(
            "Invalid destination URL",
            json!({ "reason": e.to_string() }),
        )
    })?;

    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(AppError::bad_request(
            "Destination URL must be an absolute http(s) URL",
            json!({ "scheme": url.scheme() }),
        ));
    }

    Ok(())
}
