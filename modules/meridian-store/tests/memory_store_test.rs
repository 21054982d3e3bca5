//! MemoryStore must mirror the documented store semantics; the service
//! suites lean on it in place of Postgres.

use chrono::Duration;
use serde_json::json;

use meridian_common::NewIngestedRecord;
use meridian_store::{MemoryStore, RecordStore, StoreError};

fn record(record_type: &str, payload: serde_json::Value, source: &str) -> NewIngestedRecord {
    NewIngestedRecord {
        record_type: record_type.to_string(),
        payload,
        source: source.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[tokio::test]
async fn users_round_trip_by_username_and_id() {
    let store = MemoryStore::new();
    let created = store.insert_user("alice_01", "alice@example.com").await.unwrap();

    let by_name = store.find_user_by_username("alice_01").await.unwrap().unwrap();
    let by_id = store.find_user_by_id(created.id).await.unwrap().unwrap();

    assert_eq!(by_name.id, created.id);
    assert_eq!(by_id.email, "alice@example.com");
    assert!(store.find_user_by_username("nobody").await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_username_is_a_conflict() {
    let store = MemoryStore::new();
    store.insert_user("alice", "a@example.com").await.unwrap();

    let err = store.insert_user("alice", "b@example.com").await.unwrap_err();
    match err {
        StoreError::Conflict(message) => assert_eq!(message, "username already exists"),
        other => panic!("expected conflict, got {other:?}"),
    }
}

#[tokio::test]
async fn recent_users_are_newest_first_and_capped() {
    let store = MemoryStore::new();
    for i in 0..5 {
        store
            .insert_user(&format!("user_{i}"), &format!("u{i}@example.com"))
            .await
            .unwrap();
    }

    let recent = store.list_recent_users(3).await.unwrap();
    let names: Vec<&str> = recent.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(names, vec!["user_4", "user_3", "user_2"]);
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

#[tokio::test]
async fn identical_orders_create_distinct_rows() {
    // No dedup key is derived from input: submitting twice must produce two
    // orders. This is the documented non-idempotence.
    let store = MemoryStore::new();
    let user = store.insert_user("buyer", "b@example.com").await.unwrap();

    let first = store.insert_order(user.id, 10.0).await.unwrap();
    let second = store.insert_order(user.id, 10.0).await.unwrap();

    assert_ne!(first.id, second.id);
    assert_eq!(first.status, "pending");
    assert_eq!(second.status, "pending");
    assert_eq!(store.order_count(), 2);
}

#[tokio::test]
async fn analytics_summary_totals_and_empty_defaults() {
    let store = MemoryStore::new();
    let empty = store.analytics_summary().await.unwrap();
    assert_eq!(empty.users, 0);
    assert_eq!(empty.order_count, 0);
    assert_eq!(empty.total_amount, 0.0);
    assert_eq!(empty.average_amount, 0.0);

    let user = store.insert_user("buyer", "b@example.com").await.unwrap();
    store.insert_order(user.id, 10.0).await.unwrap();
    store.insert_order(user.id, 20.0).await.unwrap();

    let summary = store.analytics_summary().await.unwrap();
    assert_eq!(summary.users, 1);
    assert_eq!(summary.order_count, 2);
    assert_eq!(summary.total_amount, 30.0);
    assert_eq!(summary.average_amount, 15.0);
}

// ---------------------------------------------------------------------------
// Ingestion
// ---------------------------------------------------------------------------

#[tokio::test]
async fn insert_ingested_preserves_order_and_stamps_region() {
    let store = MemoryStore::new();
    let rows = store
        .insert_ingested(
            "eu-west",
            &[
                record("a", json!({"n": 1}), "api"),
                record("b", json!({"n": 2}), "api"),
            ],
        )
        .await
        .unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].record_type, "a");
    assert_eq!(rows[1].record_type, "b");
    assert!(rows.iter().all(|r| r.region == "eu-west"));
    assert_eq!(rows[0].payload, json!({"n": 1}));
}

#[tokio::test]
async fn bulk_insert_reports_count_only() {
    let store = MemoryStore::new();
    let count = store
        .bulk_insert_ingested(
            "eu-west",
            &[
                record("a", json!({}), "batch"),
                record("a", json!({}), "batch"),
                record("b", json!({}), "batch"),
            ],
        )
        .await
        .unwrap();

    assert_eq!(count, 3);
    assert_eq!(store.ingest_stats().await.unwrap().total_records, 3);
}

#[tokio::test]
async fn stats_count_distincts_and_rank_types() {
    let store = MemoryStore::new();
    store
        .insert_ingested(
            "eu-west",
            &[
                record("sensor", json!({}), "api"),
                record("sensor", json!({}), "api"),
                record("sensor", json!({}), "batch"),
                record("clickstream", json!({}), "api"),
            ],
        )
        .await
        .unwrap();

    let stats = store.ingest_stats().await.unwrap();
    assert_eq!(stats.total_records, 4);
    assert_eq!(stats.unique_types, 2);
    assert_eq!(stats.unique_sources, 2);
    assert_eq!(stats.by_type[0].record_type, "sensor");
    assert_eq!(stats.by_type[0].count, 3);
    assert_eq!(stats.by_type[1].record_type, "clickstream");
    assert_eq!(stats.by_type[1].count, 1);
}

#[tokio::test]
async fn stats_top_types_truncate_to_ten() {
    let store = MemoryStore::new();
    let records: Vec<NewIngestedRecord> = (0..12)
        .map(|i| record(&format!("type_{i}"), json!({}), "api"))
        .collect();
    store.insert_ingested("eu-west", &records).await.unwrap();

    let stats = store.ingest_stats().await.unwrap();
    assert_eq!(stats.unique_types, 12);
    assert_eq!(stats.by_type.len(), 10);
}

#[tokio::test]
async fn stats_trailing_hour_window_excludes_old_records() {
    let store = MemoryStore::new();
    let rows = store
        .insert_ingested(
            "eu-west",
            &[record("a", json!({}), "api"), record("a", json!({}), "api")],
        )
        .await
        .unwrap();

    store.rewind_created_at(rows[0].id, Duration::hours(2));

    let stats = store.ingest_stats().await.unwrap();
    assert_eq!(stats.total_records, 2);
    assert_eq!(stats.recent_hour_count, 1);
}

#[tokio::test]
async fn recent_listing_filters_limits_and_orders_newest_first() {
    let store = MemoryStore::new();
    store
        .insert_ingested(
            "eu-west",
            &[
                record("a", json!({"seq": 1}), "api"),
                record("b", json!({"seq": 2}), "api"),
                record("a", json!({"seq": 3}), "api"),
            ],
        )
        .await
        .unwrap();

    let all = store.list_recent_ingested(50, None).await.unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].payload, json!({"seq": 3}));

    let only_a = store.list_recent_ingested(50, Some("a")).await.unwrap();
    assert_eq!(only_a.len(), 2);
    assert!(only_a.iter().all(|r| r.record_type == "a"));
    assert_eq!(only_a[0].payload, json!({"seq": 3}));

    let limited = store.list_recent_ingested(1, None).await.unwrap();
    assert_eq!(limited.len(), 1);
}

// ---------------------------------------------------------------------------
// Connectivity probe
// ---------------------------------------------------------------------------

#[tokio::test]
async fn offline_store_fails_ping() {
    let store = MemoryStore::new();
    assert!(store.ping().await.is_ok());

    store.set_offline(true);
    assert!(store.ping().await.is_err());

    store.set_offline(false);
    assert!(store.ping().await.is_ok());
}
