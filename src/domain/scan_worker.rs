//! Background worker persisting scan events.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::domain::enrichment::ScanEnricher;
use crate::domain::entities::NewScanEvent;
use crate::domain::repositories::ScanRepository;
use crate::domain::scan_message::ScanMessage;

/// Consumes scan messages, enriches them, and appends them to the log.
///
/// Runs until the sending side of the channel is dropped. Persistence
/// failures are logged and the message is discarded: the redirect and the
/// counter increment already happened on the request path, and losing one
/// analytics row is the accepted trade-off over blocking or retrying
/// unboundedly.
pub async fn run_scan_worker(
    mut rx: mpsc::Receiver<ScanMessage>,
    scan_repository: Arc<dyn ScanRepository>,
    enricher: Arc<dyn ScanEnricher>,
) {
    while let Some(msg) = rx.recv().await {
        let enrichment = enricher
            .enrich(msg.ip.as_deref(), msg.user_agent.as_deref())
            .await;

        // Edge-supplied geo headers win over lookup results.
        let event = NewScanEvent {
            qr_record_id: msg.qr_record_id,
            owner_id: msg.owner_id,
            ip: msg.ip,
            user_agent: msg.user_agent,
            referrer: msg.referrer,
            country: msg.geo_hint.country.or(enrichment.country),
            city: msg.geo_hint.city.or(enrichment.city),
            region: msg.geo_hint.region.or(enrichment.region),
            device_type: enrichment.device_type,
            browser: enrichment.browser,
            os: enrichment.os,
        };

        match scan_repository.append(event).await {
            Ok(saved) => debug!(
                qr_record_id = %saved.qr_record_id,
                scan_event_id = saved.id,
                "scan event recorded"
            ),
            Err(e) => warn!(
                qr_record_id = %msg.qr_record_id,
                error = %e,
                "failed to record scan event"
            ),
        }
    }

    debug!("scan worker channel closed, shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::enrichment::{Enrichment, MockScanEnricher};
    use crate::domain::entities::ScanEvent;
    use crate::domain::repositories::MockScanRepository;
    use crate::domain::scan_message::GeoHint;
    use chrono::Utc;
    use uuid::Uuid;

    fn saved_event(event: &NewScanEvent) -> ScanEvent {
        ScanEvent {
            id: 1,
            qr_record_id: event.qr_record_id,
            owner_id: event.owner_id,
            occurred_at: Utc::now(),
            ip: event.ip.clone(),
            user_agent: event.user_agent.clone(),
            referrer: event.referrer.clone(),
            country: event.country.clone(),
            city: event.city.clone(),
            region: event.region.clone(),
            device_type: event.device_type.clone(),
            browser: event.browser.clone(),
            os: event.os.clone(),
        }
    }

    #[tokio::test]
    async fn test_worker_appends_enriched_event() {
        let qr_id = Uuid::new_v4();

        let mut enricher = MockScanEnricher::new();
        enricher.expect_enrich().times(1).returning(|_, _| {
            Enrichment {
                device_type: Some("mobile".to_string()),
                browser: Some("Chrome".to_string()),
                os: Some("Android".to_string()),
                ..Enrichment::default()
            }
        });

        let mut repo = MockScanRepository::new();
        repo.expect_append()
            .withf(move |e| {
                e.qr_record_id == qr_id
                    && e.owner_id == 3
                    && e.device_type.as_deref() == Some("mobile")
            })
            .times(1)
            .returning(|e| Ok(saved_event(&e)));

        let (tx, rx) = mpsc::channel(4);
        let handle = tokio::spawn(run_scan_worker(rx, Arc::new(repo), Arc::new(enricher)));

        tx.send(ScanMessage::new(
            qr_id,
            3,
            Some("198.51.100.4".to_string()),
            Some("Mozilla/5.0 (Linux; Android 14)"),
            None,
            GeoHint::default(),
        ))
        .await
        .unwrap();

        drop(tx);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_worker_prefers_header_geo_hint() {
        let qr_id = Uuid::new_v4();

        let mut enricher = MockScanEnricher::new();
        enricher.expect_enrich().times(1).returning(|_, _| {
            Enrichment {
                country: Some("US".to_string()),
                ..Enrichment::default()
            }
        });

        let mut repo = MockScanRepository::new();
        repo.expect_append()
            .withf(|e| e.country.as_deref() == Some("DE"))
            .times(1)
            .returning(|e| Ok(saved_event(&e)));

        let (tx, rx) = mpsc::channel(4);
        let handle = tokio::spawn(run_scan_worker(rx, Arc::new(repo), Arc::new(enricher)));

        tx.send(ScanMessage::new(
            qr_id,
            1,
            None,
            None,
            None,
            GeoHint {
                country: Some("DE".to_string()),
                city: None,
                region: None,
            },
        ))
        .await
        .unwrap();

        drop(tx);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_worker_survives_append_failure() {
        let mut enricher = MockScanEnricher::new();
        enricher
            .expect_enrich()
            .times(2)
            .returning(|_, _| Enrichment::default());

        let mut repo = MockScanRepository::new();
        let mut first = true;
        repo.expect_append().times(2).returning(move |e| {
            if first {
                first = false;
                Err(crate::error::AppError::unavailable(
                    "down",
                    serde_json::json!({}),
                ))
            } else {
                Ok(saved_event(&e))
            }
        });

        let (tx, rx) = mpsc::channel(4);
        let handle = tokio::spawn(run_scan_worker(rx, Arc::new(repo), Arc::new(enricher)));

        for _ in 0..2 {
            tx.send(ScanMessage::new(
                Uuid::new_v4(),
                1,
                None,
                None,
                None,
                GeoHint::default(),
            ))
            .await
            .unwrap();
        }

        drop(tx);
        handle.await.unwrap();
    }
}
