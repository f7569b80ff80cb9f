// SPDX-FileCopyrightText: 2026 Hookline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end integration tests for the complete Hookline HTTP surface.
//!
//! Each test creates an isolated TestHarness with a temp SQLite database and
//! a private metrics recorder. Tests are independent and order-insensitive.

use std::sync::Arc;

use axum::http::StatusCode;
use hookline_core::StorageAdapter;
use hookline_test_utils::{webhook_body, MockStore, TestHarness};

const TS: &str = "2025-01-15T10:00:00Z";

// ---- Test 1: Idempotent ingestion ----

#[tokio::test]
async fn test_ok_then_duplicate_stores_one_row_and_counts_both() {
    let harness = TestHarness::builder().build().await.unwrap();
    let body = webhook_body("m1", "+919876543210", TS, Some("Hello"));

    let first = harness.post_signed(&body).await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.json()["status"], "ok");

    let second = harness.post_signed(&body).await;
    assert_eq!(second.status, StatusCode::OK);
    assert_eq!(second.json()["status"], "ok");

    let page = harness.storage.list_messages(50, 0).await.unwrap();
    assert_eq!(page.total, 1);

    let metrics = harness.get("/metrics").await.body;
    assert!(metrics.contains(r#"webhook_requests_total{result="created"} 1"#));
    assert!(metrics.contains(r#"webhook_requests_total{result="duplicate"} 1"#));
    assert!(metrics.contains(r#"http_requests_total{path="/webhook",status="200"} 2"#));
}

#[tokio::test]
async fn test_duplicate_with_different_content_keeps_original() {
    let harness = TestHarness::builder().build().await.unwrap();
    harness
        .post_signed(&webhook_body("m1", "+111", TS, Some("original")))
        .await;
    harness
        .post_signed(&webhook_body("m1", "+222", "2026-01-01T00:00:00Z", Some("changed")))
        .await;

    let stored = harness.storage.get_message("m1").await.unwrap().unwrap();
    assert_eq!(stored.from, "+111");
    assert_eq!(stored.text.as_deref(), Some("original"));
    assert_eq!(stored.ts, TS);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_same_id_deliveries() {
    let harness = Arc::new(TestHarness::builder().build().await.unwrap());
    let body = webhook_body("race", "+1", TS, None);

    let tasks = (0..10).map(|_| {
        let harness = Arc::clone(&harness);
        let body = body.clone();
        tokio::spawn(async move { harness.post_signed(&body).await.status })
    });
    for status in futures::future::join_all(tasks).await {
        assert_eq!(status.unwrap(), StatusCode::OK);
    }

    assert_eq!(harness.storage.list_messages(50, 0).await.unwrap().total, 1);
    let metrics = harness.get("/metrics").await.body;
    assert!(metrics.contains(r#"webhook_requests_total{result="created"} 1"#));
    assert!(metrics.contains(r#"webhook_requests_total{result="duplicate"} 9"#));
}

// ---- Test 2: Authentication ----

#[tokio::test]
async fn test_bad_signature_is_401_and_stores_nothing() {
    let harness = TestHarness::builder().build().await.unwrap();
    let body = webhook_body("m1", "+1", TS, None);

    let response = harness.post_webhook(&body, Some("0000")).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.json()["detail"], "invalid signature");

    assert_eq!(harness.storage.list_messages(50, 0).await.unwrap().total, 0);
    let metrics = harness.get("/metrics").await.body;
    assert!(metrics.contains(r#"webhook_requests_total{result="invalid_signature"} 1"#));
    assert!(!metrics.contains(r#"result="created""#));
}

#[tokio::test]
async fn test_missing_signature_header_is_401() {
    let harness = TestHarness::builder().build().await.unwrap();
    let response = harness
        .post_webhook(&webhook_body("m1", "+1", TS, None), None)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_signature_from_other_secret_is_401() {
    let harness = TestHarness::builder().build().await.unwrap();
    let body = webhook_body("m1", "+1", TS, None);
    let sig = hookline_security::sign(b"not-the-secret", body.as_bytes());
    let response = harness.post_webhook(&body, Some(&sig)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

// ---- Test 3: Validation ----

#[tokio::test]
async fn test_malformed_payload_is_422() {
    let harness = TestHarness::builder().build().await.unwrap();
    for body in [
        "{not json".to_string(),
        r#"{"message_id":"m1","from":"+1"}"#.to_string(),
        webhook_body("m1", "12345", TS, None),
        webhook_body("m1", "+1", "2025-01-15T10:00:00", None),
        webhook_body("m1", "+1", TS, Some(&"a".repeat(4097))),
    ] {
        let response = harness.post_signed(&body).await;
        assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY, "{body}");
        assert!(response.json()["errors"].as_array().is_some());
    }
    assert_eq!(harness.storage.list_messages(50, 0).await.unwrap().total, 0);
    let metrics = harness.get("/metrics").await.body;
    assert!(metrics.contains(r#"webhook_requests_total{result="validation_error"} 5"#));
}

// ---- Test 4: Listing ----

#[tokio::test]
async fn test_messages_ordered_by_ts_then_id() {
    let harness = TestHarness::builder().build().await.unwrap();
    for (id, ts) in [
        ("b", "2025-01-15T10:00:00Z"),
        ("c", "2025-01-14T10:00:00Z"),
        ("a", "2025-01-15T10:00:00Z"),
    ] {
        harness
            .post_signed(&webhook_body(id, "+1", ts, None))
            .await;
    }

    let json = harness.get("/messages").await.json();
    let ids: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["message_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["c", "a", "b"]);
    assert!(json["data"][0].get("received_at").is_none());
    assert!(json["data"][0]["text"].is_null());
}

#[tokio::test]
async fn test_pagination_reports_full_total() {
    let harness = TestHarness::builder().build().await.unwrap();
    for i in 0..5 {
        let ts = format!("2025-01-15T10:00:0{i}Z");
        harness
            .post_signed(&webhook_body(&format!("m{i}"), "+1", &ts, None))
            .await;
    }

    let json = harness.get("/messages?limit=2&offset=2").await.json();
    assert_eq!(json["total"], 5);
    assert_eq!(json["limit"], 2);
    assert_eq!(json["offset"], 2);
    let ids: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["message_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["m2", "m3"]);
}

#[tokio::test]
async fn test_bad_query_params_are_400() {
    let harness = TestHarness::builder().build().await.unwrap();
    assert_eq!(
        harness.get("/messages?limit=ten").await.status,
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        harness.get("/messages?offset=-1").await.status,
        StatusCode::BAD_REQUEST
    );
}

// ---- Test 5: Stats ----

#[tokio::test]
async fn test_stats_on_empty_store() {
    let harness = TestHarness::builder().build().await.unwrap();
    let json = harness.get("/stats").await.json();
    assert_eq!(json["total_messages"], 0);
    assert_eq!(json["senders_count"], 0);
    assert_eq!(json["messages_per_sender"], serde_json::json!([]));
    assert!(json["first_message_ts"].is_null());
    assert!(json["last_message_ts"].is_null());
}

#[tokio::test]
async fn test_stats_truncates_senders_to_ten() {
    let harness = TestHarness::builder().build().await.unwrap();
    for i in 0..12 {
        let from = format!("+1000{i:02}");
        let count = if i == 11 { 3 } else { 1 };
        for n in 0..count {
            let ts = format!("2025-01-{:02}T10:00:00Z", i + 1);
            harness
                .post_signed(&webhook_body(&format!("m{i}-{n}"), &from, &ts, None))
                .await;
        }
    }

    let json = harness.get("/stats").await.json();
    assert_eq!(json["total_messages"], 14);
    assert_eq!(json["senders_count"], 10);
    let senders = json["messages_per_sender"].as_array().unwrap();
    assert_eq!(senders.len(), 10);
    assert_eq!(senders[0]["from"], "+100011");
    assert_eq!(senders[0]["count"], 3);
    assert_eq!(senders[1]["from"], "+100000");
    assert_eq!(json["first_message_ts"], "2025-01-01T10:00:00Z");
    assert_eq!(json["last_message_ts"], "2025-01-12T10:00:00Z");
}

// ---- Test 6: Probes and storage failure ----

#[tokio::test]
async fn test_probes_when_healthy() {
    let harness = TestHarness::builder().build().await.unwrap();
    let live = harness.get("/health/live").await;
    assert_eq!(live.status, StatusCode::OK);
    assert_eq!(live.json()["status"], "alive");

    let ready = harness.get("/health/ready").await;
    assert_eq!(ready.status, StatusCode::OK);
    assert_eq!(ready.json()["status"], "ready");
}

#[tokio::test]
async fn test_store_outage() {
    let store = Arc::new(MockStore::new());
    let harness = TestHarness::builder()
        .with_store(store.clone())
        .build()
        .await
        .unwrap();
    store.set_down(true);

    let ready = harness.get("/health/ready").await;
    assert_eq!(ready.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(ready.json()["detail"], "not ready");

    let live = harness.get("/health/live").await;
    assert_eq!(live.status, StatusCode::OK);

    let response = harness
        .post_signed(&webhook_body("m1", "+1", TS, None))
        .await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json()["detail"], "storage unavailable");

    assert_eq!(
        harness.get("/stats").await.status,
        StatusCode::INTERNAL_SERVER_ERROR
    );
    let metrics = harness.get("/metrics").await.body;
    assert!(metrics.contains(r#"webhook_requests_total{result="storage_error"} 1"#));

    store.set_down(false);
    let response = harness
        .post_signed(&webhook_body("m1", "+1", TS, None))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_every_response_carries_request_id() {
    let harness = TestHarness::builder().build().await.unwrap();
    let a = harness.get("/health/live").await;
    let b = harness.get("/health/live").await;
    let id_a = a.headers.get("x-request-id").unwrap();
    let id_b = b.headers.get("x-request-id").unwrap();
    assert_ne!(id_a, id_b);
}
