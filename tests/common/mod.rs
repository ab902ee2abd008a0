#![allow(dead_code)]

use axum::extract::ConnectInfo;
use qr_relay::application::services::auth_service::hash_token;
use qr_relay::domain::scan_message::ScanMessage;
use qr_relay::state::AppState;
use sqlx::PgPool;
use std::net::SocketAddr;
use tokio::sync::mpsc;
use uuid::Uuid;

pub const TEST_SIGNING_SECRET: &str = "test-signing-secret";
pub const TEST_BASE_URL: &str = "https://qr.test";

pub async fn create_test_account(pool: &PgPool, email: &str, plan: &str, token: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO accounts (email, plan, token_hash) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(email)
    .bind(plan)
    .bind(hash_token(TEST_SIGNING_SECRET, token))
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_test_record(pool: &PgPool, owner_id: i64, code: &str, url: &str) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO qr_records (id, owner_id, title, destination_url, short_code, qr_image) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
    )
    .bind(Uuid::new_v4())
    .bind(owner_id)
    .bind(code)
    .bind(url)
    .bind(code)
    .bind("data:image/svg+xml;base64,AAAA")
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_inactive_record(pool: &PgPool, owner_id: i64, code: &str, url: &str) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO qr_records (id, owner_id, title, destination_url, short_code, qr_image, is_active) \
         VALUES ($1, $2, $3, $4, $5, $6, FALSE) RETURNING id",
    )
    .bind(Uuid::new_v4())
    .bind(owner_id)
    .bind(code)
    .bind(url)
    .bind(code)
    .bind("data:image/svg+xml;base64,AAAA")
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_test_scan(
    pool: &PgPool,
    qr_record_id: Uuid,
    owner_id: i64,
    country: Option<&str>,
    device_type: Option<&str>,
) {
    sqlx::query(
        "INSERT INTO scan_events (qr_record_id, owner_id, country, device_type) \
         VALUES ($1, $2, $3, $4)",
    )
    .bind(qr_record_id)
    .bind(owner_id)
    .bind(country)
    .bind(device_type)
    .execute(pool)
    .await
    .unwrap();
}

pub async fn scan_count(pool: &PgPool, id: Uuid) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT scan_count FROM qr_records WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn scan_event_count(pool: &PgPool, id: Uuid) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM scan_events WHERE qr_record_id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Injects a fixed client socket address, standing in for the
/// `into_make_service_with_connect_info` wiring of the real server.
///
/// Must be the outermost layer so that rate limiting and IP extraction
/// see the address.
#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> tower::Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}

pub fn create_test_state(pool: PgPool) -> (AppState, mpsc::Receiver<ScanMessage>) {
    let (tx, rx) = mpsc::channel(100);

    let state = AppState::new(
        pool,
        TEST_BASE_URL.to_string(),
        TEST_SIGNING_SECRET.to_string(),
        tx,
    );

    (state, rx)
}
