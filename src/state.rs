//! Shared application state injected into handlers.

use std::sync::Arc;

use sqlx::PgPool;
use tokio::sync::mpsc;

use crate::application::services::{AnalyticsService, AuthService, QrService, RedirectService};
use crate::domain::renderer::QrRenderer;
use crate::domain::scan_message::ScanMessage;
use crate::infrastructure::persistence::{PgAccountRepository, PgQrRepository, PgScanRepository};
use crate::infrastructure::render::SvgQrRenderer;

/// Application state shared across all request handlers.
///
/// Services are cheap to clone (`Arc` internals); the pool itself is kept
/// around for health checks.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub auth_service: Arc<AuthService<PgAccountRepository>>,
    pub qr_service: Arc<QrService<PgQrRepository>>,
    pub redirect_service: Arc<RedirectService<PgQrRepository>>,
    pub analytics_service: Arc<AnalyticsService<PgQrRepository, PgScanRepository>>,
    pub scan_tx: mpsc::Sender<ScanMessage>,
}

impl AppState {
    /// Wires repositories and services around one pool and one scan channel.
    pub fn new(
        db: PgPool,
        public_base_url: String,
        token_signing_secret: String,
        scan_tx: mpsc::Sender<ScanMessage>,
    ) -> Self {
        let pool = Arc::new(db.clone());
        let qr_repository = Arc::new(PgQrRepository::new(pool.clone()));
        let account_repository = Arc::new(PgAccountRepository::new(pool.clone()));
        let scan_repository = Arc::new(PgScanRepository::new(pool));
        let renderer: Arc<dyn QrRenderer> = Arc::new(SvgQrRenderer::new());

        Self {
            db,
            auth_service: Arc::new(AuthService::new(account_repository, token_signing_secret)),
            qr_service: Arc::new(QrService::new(
                qr_repository.clone(),
                renderer,
                public_base_url,
            )),
            redirect_service: Arc::new(RedirectService::new(
                qr_repository.clone(),
                scan_tx.clone(),
            )),
            analytics_service: Arc::new(AnalyticsService::new(qr_repository, scan_repository)),
            scan_tx,
        }
    }
}
