mod common;

use axum::{routing::get, Router};
use axum_test::TestServer;
use qr_relay::api::middleware::rate_limit;

fn limited_server() -> TestServer {
    let app = Router::new()
        .route("/ping", get(|| async { "pong" }))
        .layer(rate_limit::api_layer())
        .layer(common::MockConnectInfoLayer);

    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn test_burst_exhaustion_returns_json_429() {
    let server = limited_server();

    // The API tier allows a burst of 20; well over that from one IP must
    // eventually get throttled.
    let mut limited = None;
    for _ in 0..40 {
        let response = server.get("/ping").await;
        if response.status_code() == 429 {
            limited = Some(response);
            break;
        }
        assert_eq!(response.status_code(), 200);
    }

    let response = limited.expect("burst was never exhausted");
    assert!(response.headers().contains_key("retry-after"));

    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["code"], "rate_limited");
    assert!(body["error"]["details"]["retry_after_secs"].is_number());
}

#[tokio::test]
async fn test_requests_within_burst_pass() {
    let server = limited_server();

    for _ in 0..10 {
        let response = server.get("/ping").await;
        assert_eq!(response.status_code(), 200);
    }
}
