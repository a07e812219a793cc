// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use bytes::Bytes;
use http_body_util::Full;
use hyper::{header, http, Response, StatusCode};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, error};

pub type HttpResponse = Response<Full<Bytes>>;

/// Does two things:
/// 1. Logs the given message. Client errors (4xx) are logged at debug level, anything else
///    at error level.
/// 2. Returns the given message in the body of a JSON response with the given status code.
///
/// Response body format:
/// {
///     "error": message
/// }
pub fn log_and_create_error_response(
    message: &str,
    status: StatusCode,
) -> http::Result<HttpResponse> {
    if status.is_client_error() {
        debug!("{message}");
    } else {
        error!("{message}");
    }
    let body = json!({ "error": message }).to_string();
    json_response(status, body)
}

/// Serializes `payload` as the JSON body of a response with the given status code.
pub fn create_json_response<T: Serialize>(
    payload: &T,
    status: StatusCode,
) -> http::Result<HttpResponse> {
    match serde_json::to_string(payload) {
        Ok(body) => json_response(status, body),
        Err(err) => log_and_create_error_response(
            &format!("Error serializing response: {err}"),
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
    }
}

fn json_response(status: StatusCode, body: String) -> http::Result<HttpResponse> {
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from(body)))
}
