// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Helper functions for integration tests

use http_body_util::{BodyExt, Empty};
use hyper::body::Bytes;
use hyper::{Request, StatusCode};
use hyper_util::rt::TokioIo;
use serde_json::{json, Value};
use ses_event_logs::config::Config;
use ses_event_logs::log_store::LogStore;
use ses_event_logs::report_server::ReportServer;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::time::timeout;

/// Start a report server on a random local port
pub async fn start_report_server(log_store: Arc<dyn LogStore + Send + Sync>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind report server");
    let addr = listener.local_addr().expect("Failed to get local addr");

    let server = ReportServer {
        config: Arc::new(Config::default()),
        log_store,
    };
    tokio::spawn(async move {
        let _ = server.serve(listener).await;
    });
    addr
}

/// Send a GET request over TCP and return the status with the decoded JSON body
pub async fn get_json(
    addr: SocketAddr,
    uri: &str,
) -> Result<(StatusCode, Value), Box<dyn std::error::Error>> {
    let stream = timeout(Duration::from_secs(2), tokio::net::TcpStream::connect(addr)).await??;

    let io = TokioIo::new(stream);
    let (mut sender, conn) = hyper::client::conn::http1::handshake(io).await?;

    tokio::spawn(async move {
        let _ = conn.await;
    });

    let request = Request::builder()
        .uri(uri)
        .method("GET")
        .header("Host", addr.to_string())
        .body(Empty::<Bytes>::new())?;
    let response = timeout(Duration::from_secs(5), sender.send_request(request)).await??;

    let status = response.status();
    let body = response.into_body().collect().await?.to_bytes();
    Ok((status, serde_json::from_slice(&body)?))
}

pub fn report_uri(log_group: &str, start: &str, end: &str, event_type: &str) -> String {
    format!(
        "/api/get_ses_logs?log-group={log_group}&start-date={start}&end-date={end}&event-type={event_type}"
    )
}

pub fn bounce_message(recipients: &[&str], identity: Option<&str>) -> String {
    let mut mail = json!({
        "timestamp": "2024-01-05T09:59:58.000Z",
        "source": "noreply@example.com",
        "destination": recipients,
        "tags": {}
    });
    if let Some(identity) = identity {
        mail["tags"]["ses:caller-identity"] = json!([identity]);
    }
    let bounced: Vec<Value> = recipients
        .iter()
        .map(|r| json!({"emailAddress": r, "action": "failed", "status": "5.1.1"}))
        .collect();
    json!({
        "eventType": "Bounce",
        "bounce": {
            "bounceType": "Permanent",
            "bounceSubType": "General",
            "bouncedRecipients": bounced,
            "timestamp": "2024-01-05T10:00:00.000Z",
            "feedbackId": "0100018cd5"
        },
        "mail": mail
    })
    .to_string()
}

pub fn send_message(destinations: &[&str]) -> String {
    json!({
        "eventType": "Send",
        "mail": {
            "timestamp": "2024-01-06T12:00:00.000Z",
            "source": "news@example.com",
            "destination": destinations,
            "tags": {"ses:caller-identity": ["newsletter"]}
        },
        "send": {}
    })
    .to_string()
}
