// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

mod common;

use common::helpers::{bounce_message, get_json, report_uri, send_message, start_report_server};
use common::mocks::MockLogStore;
use hyper::StatusCode;
use serde_json::json;
use ses_event_logs::log_store::LogStoreError;
use std::sync::Arc;

#[tokio::test]
async fn test_bounce_report_end_to_end() {
    let store = Arc::new(
        MockLogStore::new(2)
            .with_stream("2024-02-01-c", vec![bounce_message(&["late@x.com"], None)])
            .with_stream(
                "2024-01-10-b",
                vec![
                    bounce_message(&["a@x.com", "b@x.com"], Some("billing")),
                    "not json at all".to_string(),
                    send_message(&["c@x.com"]),
                ],
            )
            .with_stream("2024-01-05-a", vec![bounce_message(&["d@x.com"], None)]),
    );
    let addr = start_report_server(store.clone()).await;

    let (status, body) = get_json(
        addr,
        &report_uri("ses", "2024-01-01", "2024-01-31", "bounce"),
    )
    .await
    .expect("report request failed");

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "bounce_data": [
                {
                    "timestamp": "2024-01-05T10:00:00.000Z",
                    "source_email": "noreply@example.com",
                    "bounced_email": "a@x.com",
                    "bounce_type": "Permanent",
                    "ses_caller_identity": "billing"
                },
                {
                    "timestamp": "2024-01-05T10:00:00.000Z",
                    "source_email": "noreply@example.com",
                    "bounced_email": "b@x.com",
                    "bounce_type": "Permanent",
                    "ses_caller_identity": "billing"
                },
                {
                    "timestamp": "2024-01-05T10:00:00.000Z",
                    "source_email": "noreply@example.com",
                    "bounced_email": "d@x.com",
                    "bounce_type": "Permanent",
                    "ses_caller_identity": "Unknown"
                }
            ],
            "delivery_data": [],
            "complaint_data": [],
            "open_data": [],
            "send_data": []
        })
    );
}

#[tokio::test]
async fn test_missing_event_type_makes_no_remote_calls() {
    let store = Arc::new(
        MockLogStore::new(10).with_stream("2024-01-05-a", vec![send_message(&["a@x.com"])]),
    );
    let addr = start_report_server(store.clone()).await;

    let (status, body) = get_json(
        addr,
        "/api/get_ses_logs?log-group=ses&start-date=2024-01-01&end-date=2024-01-31",
    )
    .await
    .expect("report request failed");

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Missing required parameters"}));
    assert_eq!(store.remote_calls(), 0);
}

#[tokio::test]
async fn test_missing_stream_does_not_fail_the_report() {
    let store = Arc::new(
        MockLogStore::new(10)
            .with_stream("2024-01-20-c", vec![send_message(&["c@x.com"])])
            .with_missing_stream("2024-01-10-b")
            .with_stream("2024-01-05-a", vec![send_message(&["a@x.com", "b@x.com"])]),
    );
    let addr = start_report_server(store.clone()).await;

    let (status, body) = get_json(addr, &report_uri("ses", "2024-01-01", "2024-01-31", "send"))
        .await
        .expect("report request failed");

    assert_eq!(status, StatusCode::OK);
    let destinations: Vec<&str> = body["send_data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|record| record["destination"].as_str().unwrap())
        .collect();
    assert_eq!(destinations, vec!["c@x.com", "a@x.com", "b@x.com"]);
    assert_eq!(body["send_data"][0]["ses_caller_identity"], "newsletter");
}

#[tokio::test]
async fn test_no_matching_events_still_returns_all_keys() {
    let store = Arc::new(
        MockLogStore::new(10).with_stream("2024-01-05-a", vec![send_message(&["a@x.com"])]),
    );
    let addr = start_report_server(store).await;

    let (status, body) = get_json(
        addr,
        &report_uri("ses", "2024-01-01", "2024-01-31", "complaint"),
    )
    .await
    .expect("report request failed");

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "bounce_data": [],
            "delivery_data": [],
            "complaint_data": [],
            "open_data": [],
            "send_data": []
        })
    );
}

#[tokio::test]
async fn test_listing_failure_is_a_server_error() {
    let store = Arc::new(
        MockLogStore::new(10)
            .with_listing_error(LogStoreError::Remote("AccessDeniedException".to_string())),
    );
    let addr = start_report_server(store).await;

    let (status, body) = get_json(addr, &report_uri("ses", "2024-01-01", "2024-01-31", "open"))
        .await
        .expect("report request failed");

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["error"],
        "Failed to list log streams: log store request failed: AccessDeniedException"
    );
}

#[tokio::test]
async fn test_malformed_date_is_rejected_without_remote_calls() {
    let store = Arc::new(MockLogStore::new(10));
    let addr = start_report_server(store.clone()).await;

    let (status, body) = get_json(addr, &report_uri("ses", "2024-13-01", "2024-01-31", "open"))
        .await
        .expect("report request failed");

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid date '2024-13-01': expected yyyy-mm-dd");
    assert_eq!(store.remote_calls(), 0);
}

#[tokio::test]
async fn test_server_handles_sequential_connections() {
    let store = Arc::new(MockLogStore::new(10));
    let addr = start_report_server(store).await;

    for _ in 0..3 {
        let (status, body) = get_json(addr, "/health")
            .await
            .expect("health request failed");
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "ok"}));
    }
}
