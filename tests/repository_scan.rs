mod common;

use chrono::{Duration, Utc};
use qr_relay::domain::entities::NewScanEvent;
use qr_relay::domain::enrichment::ScanEnricher;
use qr_relay::domain::repositories::{ScanRepository, ScanScope};
use qr_relay::domain::scan_message::{GeoHint, ScanMessage};
use qr_relay::domain::scan_worker::run_scan_worker;
use qr_relay::infrastructure::enrichment::WootheeEnricher;
use qr_relay::infrastructure::persistence::PgScanRepository;
use sqlx::PgPool;
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

async fn seed_scan_at(
    pool: &PgPool,
    qr_record_id: Uuid,
    owner_id: i64,
    days_ago: i64,
    country: Option<&str>,
) {
    sqlx::query(
        "INSERT INTO scan_events (qr_record_id, owner_id, occurred_at, country) \
         VALUES ($1, $2, $3, $4)",
    )
    .bind(qr_record_id)
    .bind(owner_id)
    .bind(Utc::now() - Duration::days(days_ago))
    .bind(country)
    .execute(pool)
    .await
    .unwrap();
}

#[sqlx::test]
async fn test_append_returns_persisted_event(pool: PgPool) {
    let owner_id = common::create_test_account(&pool, "a@test.com", "free", "tok-a").await;
    let record_id = common::create_test_record(&pool, owner_id, "SCN001", "https://example.com").await;

    let repo = PgScanRepository::new(Arc::new(pool.clone()));

    let saved = repo
        .append(NewScanEvent {
            qr_record_id: record_id,
            owner_id,
            ip: Some("203.0.113.9".to_string()),
            user_agent: Some("Mozilla/5.0".to_string()),
            country: Some("DE".to_string()),
            device_type: Some("mobile".to_string()),
            ..NewScanEvent::default()
        })
        .await
        .unwrap();

    assert!(saved.id > 0);
    assert_eq!(saved.qr_record_id, record_id);
    assert_eq!(saved.country.as_deref(), Some("DE"));
    assert_eq!(common::scan_event_count(&pool, record_id).await, 1);
}

#[sqlx::test]
async fn test_counts_respect_the_window(pool: PgPool) {
    let owner_id = common::create_test_account(&pool, "a@test.com", "free", "tok-a").await;
    let record_id = common::create_test_record(&pool, owner_id, "WIN001", "https://example.com").await;

    seed_scan_at(&pool, record_id, owner_id, 0, None).await;
    seed_scan_at(&pool, record_id, owner_id, 2, None).await;
    seed_scan_at(&pool, record_id, owner_id, 40, None).await;

    let repo = PgScanRepository::new(Arc::new(pool));
    let since = Utc::now() - Duration::days(30);

    assert_eq!(repo.count_by_owner_since(owner_id, since).await.unwrap(), 2);
    assert_eq!(
        repo.count_by_record_since(record_id, since).await.unwrap(),
        2
    );
}

#[sqlx::test]
async fn test_count_by_day_groups_and_sorts(pool: PgPool) {
    let owner_id = common::create_test_account(&pool, "a@test.com", "free", "tok-a").await;
    let record_id = common::create_test_record(&pool, owner_id, "DAY001", "https://example.com").await;

    seed_scan_at(&pool, record_id, owner_id, 3, None).await;
    seed_scan_at(&pool, record_id, owner_id, 3, None).await;
    seed_scan_at(&pool, record_id, owner_id, 1, None).await;

    let repo = PgScanRepository::new(Arc::new(pool));
    let since = Utc::now() - Duration::days(30);

    let days = repo
        .count_by_day(ScanScope::Owner(owner_id), since)
        .await
        .unwrap();

    assert_eq!(days.len(), 2);
    assert!(days[0].day < days[1].day);
    assert_eq!(days[0].count, 2);
    assert_eq!(days[1].count, 1);

    let by_record = repo
        .count_by_day(ScanScope::Record(record_id), since)
        .await
        .unwrap();
    assert_eq!(by_record, days);
}

#[sqlx::test]
async fn test_count_by_country_orders_and_limits(pool: PgPool) {
    let owner_id = common::create_test_account(&pool, "a@test.com", "free", "tok-a").await;
    let record_id = common::create_test_record(&pool, owner_id, "GEO001", "https://example.com").await;

    for _ in 0..3 {
        seed_scan_at(&pool, record_id, owner_id, 0, Some("DE")).await;
    }
    for _ in 0..2 {
        seed_scan_at(&pool, record_id, owner_id, 0, Some("US")).await;
    }
    seed_scan_at(&pool, record_id, owner_id, 0, Some("FR")).await;

    let repo = PgScanRepository::new(Arc::new(pool));
    let since = Utc::now() - Duration::days(30);

    let countries = repo.count_by_country(owner_id, since, 2).await.unwrap();

    assert_eq!(countries.len(), 2);
    assert_eq!(countries[0].value.as_deref(), Some("DE"));
    assert_eq!(countries[0].count, 3);
    assert_eq!(countries[1].value.as_deref(), Some("US"));
}

#[sqlx::test]
async fn test_count_by_device_keeps_unknown_bucket(pool: PgPool) {
    let owner_id = common::create_test_account(&pool, "a@test.com", "free", "tok-a").await;
    let record_id = common::create_test_record(&pool, owner_id, "DEV001", "https://example.com").await;

    common::create_test_scan(&pool, record_id, owner_id, None, Some("mobile")).await;
    common::create_test_scan(&pool, record_id, owner_id, None, Some("mobile")).await;
    common::create_test_scan(&pool, record_id, owner_id, None, None).await;

    let repo = PgScanRepository::new(Arc::new(pool));
    let since = Utc::now() - Duration::days(30);

    let devices = repo.count_by_device(owner_id, since).await.unwrap();

    assert_eq!(devices.len(), 2);
    assert_eq!(devices[0].value.as_deref(), Some("mobile"));
    assert_eq!(devices[0].count, 2);
    // Un-enriched events still count, under a NULL bucket.
    assert_eq!(devices[1].value, None);
    assert_eq!(devices[1].count, 1);
}

#[sqlx::test]
async fn test_recent_by_record_newest_first_with_limit(pool: PgPool) {
    let owner_id = common::create_test_account(&pool, "a@test.com", "free", "tok-a").await;
    let record_id = common::create_test_record(&pool, owner_id, "REC001", "https://example.com").await;
    let other_id = common::create_test_record(&pool, owner_id, "REC002", "https://example.com").await;

    for days_ago in [5, 3, 1] {
        seed_scan_at(&pool, record_id, owner_id, days_ago, None).await;
    }
    seed_scan_at(&pool, other_id, owner_id, 0, None).await;

    let repo = PgScanRepository::new(Arc::new(pool));
    let since = Utc::now() - Duration::days(30);

    let recent = repo.recent_by_record(record_id, since, 2).await.unwrap();

    assert_eq!(recent.len(), 2);
    assert!(recent[0].occurred_at > recent[1].occurred_at);
    assert!(recent.iter().all(|e| e.qr_record_id == record_id));
}

#[sqlx::test]
async fn test_scan_worker_persists_end_to_end(pool: PgPool) {
    let owner_id = common::create_test_account(&pool, "a@test.com", "free", "tok-a").await;
    let record_id = common::create_test_record(&pool, owner_id, "WRK001", "https://example.com").await;

    let repo: Arc<dyn ScanRepository> = Arc::new(PgScanRepository::new(Arc::new(pool.clone())));
    let enricher: Arc<dyn ScanEnricher> = Arc::new(WootheeEnricher::new());

    let (tx, rx) = mpsc::channel(4);
    let handle = tokio::spawn(run_scan_worker(rx, repo.clone(), enricher));

    tx.send(ScanMessage::new(
        record_id,
        owner_id,
        Some("198.51.100.4".to_string()),
        Some("Mozilla/5.0 (Linux; Android 14) AppleWebKit/537.36 Chrome/120.0 Mobile Safari/537.36"),
        Some("https://news.example.com"),
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

    let since = Utc::now() - Duration::days(1);
    let events = repo.recent_by_record(record_id, since, 10).await.unwrap();

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].country.as_deref(), Some("DE"));
    assert_eq!(events[0].device_type.as_deref(), Some("mobile"));
    assert_eq!(
        events[0].referrer.as_deref(),
        Some("https://news.example.com")
    );
}
