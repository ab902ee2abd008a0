//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET /r/{code}`  - Public short-code redirect (rate-limited per IP)
//! - `GET /health`    - Health check (public)
//! - `/api/*`         - REST API (Bearer token required)
//!
//! # Middleware
//!
//! - **Tracing** - structured request/response logging
//! - **Rate limiting** - per-IP token bucket, separate budgets for the scan
//!   path and the API
//! - **Authentication** - Bearer token on `/api`
//! - **Path normalization** - trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::{auth, rate_limit, tracing};
use crate::state::AppState;
use axum::routing::get;
use axum::{middleware, Router};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let api_router = api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer))
        .layer(rate_limit::api_layer());

    let scan_router = Router::new()
        .route("/r/{code}", get(redirect_handler))
        .layer(rate_limit::public_layer());

    let router = Router::new()
        .merge(scan_router)
        .route("/health", get(health_handler))
        .nest("/api", api_router)
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
