// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use tracing::{debug, warn};

use crate::log_store::{LogStore, LogStoreError, RawLogEvent};

/// Upper bound accepted by CloudWatch Logs for a single `GetLogEvents` call.
pub const MAX_PAGE_LIMIT: i32 = 10_000;
pub const DEFAULT_MAX_EVENTS: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchLimits {
    /// Total events kept across all streams of a request.
    pub max_events: usize,
    /// Events requested per read call.
    pub page_limit: i32,
}

impl Default for FetchLimits {
    fn default() -> Self {
        FetchLimits {
            max_events: DEFAULT_MAX_EVENTS,
            page_limit: MAX_PAGE_LIMIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NotFound,
    Remote(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartitionOutcome {
    /// Pagination reached the end of the stream.
    Exhausted,
    /// The global event cap was hit while reading this stream.
    CapReached,
    /// A read failed; whatever was read before the failure is kept.
    Skipped(SkipReason),
}

/// What happened to one stream during a fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionReport {
    pub stream: String,
    pub outcome: PartitionOutcome,
    pub pages: usize,
    pub events: usize,
}

#[derive(Debug, Default)]
pub struct FetchOutcome {
    pub events: Vec<RawLogEvent>,
    /// One entry per stream that was visited, in visiting order. Streams after the one that
    /// reached the cap are not visited.
    pub partitions: Vec<PartitionReport>,
}

impl FetchOutcome {
    pub fn skipped_partitions(&self) -> usize {
        self.partitions
            .iter()
            .filter(|p| matches!(p.outcome, PartitionOutcome::Skipped(_)))
            .count()
    }
}

/// Reads every stream in `stream_names` from its head, in order, until each one stops
/// making progress or `limits.max_events` events have been gathered overall.
///
/// Read failures never fail the fetch: the affected stream is reported as skipped and
/// the next stream is read.
pub async fn fetch_events(
    store: &(dyn LogStore + Send + Sync),
    log_group: &str,
    stream_names: &[String],
    limits: FetchLimits,
) -> FetchOutcome {
    let mut outcome = FetchOutcome::default();

    for stream in stream_names {
        let report = fetch_stream(store, log_group, stream, limits, &mut outcome.events).await;
        let cap_reached = report.outcome == PartitionOutcome::CapReached;
        outcome.partitions.push(report);
        if cap_reached {
            debug!(
                "Reached the limit of {} events, not reading further streams",
                limits.max_events
            );
            break;
        }
    }

    outcome
}

async fn fetch_stream(
    store: &(dyn LogStore + Send + Sync),
    log_group: &str,
    stream: &str,
    limits: FetchLimits,
    events: &mut Vec<RawLogEvent>,
) -> PartitionReport {
    let mut report = PartitionReport {
        stream: stream.to_string(),
        outcome: PartitionOutcome::Exhausted,
        pages: 0,
        events: 0,
    };
    let mut next_token: Option<String> = None;

    loop {
        let page = match store
            .get_log_events(log_group, stream, next_token.as_deref(), limits.page_limit)
            .await
        {
            Ok(page) => page,
            Err(err) => {
                let reason = match err {
                    LogStoreError::NotFound(_) => SkipReason::NotFound,
                    LogStoreError::Remote(detail) => SkipReason::Remote(detail),
                };
                warn!(
                    "Stopped reading log stream {stream} after {} pages: {reason:?}",
                    report.pages
                );
                report.outcome = PartitionOutcome::Skipped(reason);
                return report;
            }
        };

        report.pages += 1;
        let first_timestamp = page.events.first().and_then(|event| event.timestamp);
        let room = limits.max_events.saturating_sub(events.len());
        let page_len = page.events.len();
        events.extend(page.events.into_iter().take(room));
        report.events += page_len.min(room);
        debug!(
            "Read page {} of log stream {stream}: {page_len} events from {first_timestamp:?}",
            report.pages
        );

        if events.len() >= limits.max_events {
            report.outcome = PartitionOutcome::CapReached;
            return report;
        }

        match page.next_forward_token {
            // the store hands back the token it was given once the stream is exhausted
            Some(token) if next_token.as_deref() != Some(token.as_str()) => {
                next_token = Some(token);
            }
            _ => return report,
        }
    }
}
