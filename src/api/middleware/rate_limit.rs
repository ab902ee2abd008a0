//! Rate limiting middleware using token bucket algorithm.

use axum::response::{IntoResponse, Response};
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use serde_json::json;
use std::sync::Arc;
use tower_governor::{
    errors::GovernorError, governor::GovernorConfigBuilder, key_extractor::PeerIpKeyExtractor,
    GovernorLayer,
};

use crate::error::AppError;

/// Rate limiter for the public scan path.
///
/// # Limits
///
/// - **Rate**: 1 request per second per client IP
/// - **Burst**: 60 requests
///
/// Generous burst, low refill: a crowd scanning the same poster is fine,
/// a scraper hammering one code is not. Requests over the limit receive
/// `429 Too Many Requests` with the standard error envelope and a
/// `Retry-After` header.
pub fn public_layer()
-> GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body> {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(1)
            .burst_size(60)
            .finish()
            .unwrap(),
    );

    GovernorLayer::new(governor_conf).error_handler(error_response)
}

/// Rate limiter for authenticated API endpoints.
///
/// # Limits
///
/// - **Rate**: 5 requests per second per client IP
/// - **Burst**: 20 requests
pub fn api_layer()
-> GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body> {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(5)
            .burst_size(20)
            .finish()
            .unwrap(),
    );

    GovernorLayer::new(governor_conf).error_handler(error_response)
}

/// Maps governor failures onto the application error envelope.
///
/// Over-limit requests become [`AppError::RateLimited`], which carries the
/// wait time both in the JSON body and the `Retry-After` header. Extractor
/// failures are server misconfiguration, not client faults.
fn error_response(e: GovernorError) -> Response {
    match e {
        GovernorError::TooManyRequests { wait_time, .. } => {
            AppError::rate_limited("Too many requests", wait_time).into_response()
        }
        GovernorError::UnableToExtractKey => {
            AppError::internal("Failed to extract rate limit key", json!({})).into_response()
        }
        GovernorError::Other { msg, .. } => {
            AppError::internal("Rate limiter error", json!({ "reason": msg })).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, StatusCode};

    #[test]
    fn test_over_limit_becomes_json_429_with_retry_after() {
        let response = error_response(GovernorError::TooManyRequests {
            wait_time: 7,
            headers: None,
        });

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            response.headers().get(header::RETRY_AFTER).unwrap(),
            &"7".parse::<axum::http::HeaderValue>().unwrap()
        );
    }

    #[test]
    fn test_extractor_failure_is_internal() {
        let response = error_response(GovernorError::UnableToExtractKey);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
