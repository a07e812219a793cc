// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use aws_sdk_cloudwatchlogs::error::DisplayErrorContext;
use aws_sdk_cloudwatchlogs::types::OrderBy;
use tracing::debug;

/// Partition of a log group as returned by the listing call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogStreamDescriptor {
    pub name: String,
}

/// One log line; `message` is the opaque payload written by SES.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLogEvent {
    pub message: String,
    /// Milliseconds since epoch, when the store reports one.
    pub timestamp: Option<i64>,
}

impl RawLogEvent {
    pub fn new(message: impl Into<String>) -> Self {
        RawLogEvent {
            message: message.into(),
            timestamp: None,
        }
    }
}

/// One page of a forward read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogEventsPage {
    pub events: Vec<RawLogEvent>,
    pub next_forward_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LogStoreError {
    /// The log group or stream does not exist (anymore).
    #[error("log resource not found: {0}")]
    NotFound(String),
    /// Any other failure reported by the store or the transport.
    #[error("log store request failed: {0}")]
    Remote(String),
}

/// Read-only view of a paginated log store.
#[async_trait]
pub trait LogStore {
    /// Lists the streams of `log_group` ordered by name, descending. Only the first page of
    /// the listing is returned.
    async fn describe_log_streams(
        &self,
        log_group: &str,
    ) -> Result<Vec<LogStreamDescriptor>, LogStoreError>;

    /// Reads up to `limit` events of `log_stream` forward from its head, resuming at
    /// `next_token` when given.
    async fn get_log_events(
        &self,
        log_group: &str,
        log_stream: &str,
        next_token: Option<&str>,
        limit: i32,
    ) -> Result<LogEventsPage, LogStoreError>;
}

/// [`LogStore`] backed by AWS CloudWatch Logs.
#[derive(Debug, Clone)]
pub struct CloudWatchLogStore {
    client: aws_sdk_cloudwatchlogs::Client,
}

impl CloudWatchLogStore {
    pub fn new(client: aws_sdk_cloudwatchlogs::Client) -> Self {
        CloudWatchLogStore { client }
    }
}

#[async_trait]
impl LogStore for CloudWatchLogStore {
    async fn describe_log_streams(
        &self,
        log_group: &str,
    ) -> Result<Vec<LogStreamDescriptor>, LogStoreError> {
        let output = self
            .client
            .describe_log_streams()
            .log_group_name(log_group)
            .order_by(OrderBy::LogStreamName)
            .descending(true)
            .send()
            .await
            .map_err(|err| {
                let not_found = err
                    .as_service_error()
                    .is_some_and(|e| e.is_resource_not_found_exception());
                classify_sdk_error(not_found, DisplayErrorContext(&err).to_string())
            })?;

        let streams: Vec<LogStreamDescriptor> = output
            .log_streams()
            .iter()
            .filter_map(|stream| stream.log_stream_name())
            .map(|name| LogStreamDescriptor {
                name: name.to_string(),
            })
            .collect();
        debug!("Listed {} log streams in {log_group}", streams.len());
        Ok(streams)
    }

    async fn get_log_events(
        &self,
        log_group: &str,
        log_stream: &str,
        next_token: Option<&str>,
        limit: i32,
    ) -> Result<LogEventsPage, LogStoreError> {
        let output = self
            .client
            .get_log_events()
            .log_group_name(log_group)
            .log_stream_name(log_stream)
            .start_from_head(true)
            .limit(limit)
            .set_next_token(next_token.map(str::to_string))
            .send()
            .await
            .map_err(|err| {
                let not_found = err
                    .as_service_error()
                    .is_some_and(|e| e.is_resource_not_found_exception());
                classify_sdk_error(not_found, DisplayErrorContext(&err).to_string())
            })?;

        let events = output
            .events()
            .iter()
            .filter_map(|event| {
                event.message().map(|message| RawLogEvent {
                    message: message.to_string(),
                    timestamp: event.timestamp(),
                })
            })
            .collect();
        Ok(LogEventsPage {
            events,
            next_forward_token: output.next_forward_token().map(str::to_string),
        })
    }
}

fn classify_sdk_error(not_found: bool, detail: String) -> LogStoreError {
    if not_found {
        LogStoreError::NotFound(detail)
    } else {
        LogStoreError::Remote(detail)
    }
}
