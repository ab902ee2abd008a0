//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, worker spawning, and the Axum server
//! lifecycle.

use crate::config::Config;
use crate::domain::enrichment::ScanEnricher;
use crate::domain::repositories::ScanRepository;
use crate::domain::scan_worker::run_scan_worker;
use crate::infrastructure::enrichment::WootheeEnricher;
use crate::infrastructure::persistence::PgScanRepository;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::Result;
use axum::extract::Request;
use axum::ServiceExt;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool (bounded acquire timeout)
/// - Migrations
/// - Background scan worker
/// - Axum HTTP server
///
/// # Errors
///
/// Returns an error if the database connection, migration run, or server
/// bind fails.
pub async fn run(config: Config) -> Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations").run(&pool).await?;

    let (scan_tx, scan_rx) = mpsc::channel(config.scan_queue_capacity);

    let scan_repository: Arc<dyn ScanRepository> =
        Arc::new(PgScanRepository::new(Arc::new(pool.clone())));
    let enricher: Arc<dyn ScanEnricher> = Arc::new(WootheeEnricher::new());
    tokio::spawn(run_scan_worker(scan_rx, scan_repository, enricher));
    tracing::info!("Scan worker started");

    let state = AppState::new(
        pool,
        config.public_base_url.clone(),
        config.token_signing_secret.clone(),
        scan_tx,
    );

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .await?;

    Ok(())
}
