// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! In-memory log store for exercising the report pipeline

use async_trait::async_trait;
use ses_event_logs::log_store::{
    LogEventsPage, LogStore, LogStoreError, LogStreamDescriptor, RawLogEvent,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Streams are served in pages of `page_size` events; the forward token is the index of the
/// next page and is handed back unchanged once a stream is exhausted.
pub struct MockLogStore {
    streams: Vec<(String, Vec<String>)>,
    page_size: usize,
    missing_streams: Vec<String>,
    listing_error: Option<LogStoreError>,
    list_calls: AtomicUsize,
    read_calls: AtomicUsize,
}

impl MockLogStore {
    pub fn new(page_size: usize) -> Self {
        MockLogStore {
            streams: Vec::new(),
            page_size,
            missing_streams: Vec::new(),
            listing_error: None,
            list_calls: AtomicUsize::new(0),
            read_calls: AtomicUsize::new(0),
        }
    }

    /// Streams are listed in insertion order, so add them in descending name order.
    pub fn with_stream(mut self, name: &str, messages: Vec<String>) -> Self {
        self.streams.push((name.to_string(), messages));
        self
    }

    /// Listed, but reading it fails with "not found".
    pub fn with_missing_stream(mut self, name: &str) -> Self {
        self.streams.push((name.to_string(), Vec::new()));
        self.missing_streams.push(name.to_string());
        self
    }

    pub fn with_listing_error(mut self, err: LogStoreError) -> Self {
        self.listing_error = Some(err);
        self
    }

    pub fn remote_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst) + self.read_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LogStore for MockLogStore {
    async fn describe_log_streams(
        &self,
        _log_group: &str,
    ) -> Result<Vec<LogStreamDescriptor>, LogStoreError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = &self.listing_error {
            return Err(err.clone());
        }
        Ok(self
            .streams
            .iter()
            .map(|(name, _)| LogStreamDescriptor { name: name.clone() })
            .collect())
    }

    async fn get_log_events(
        &self,
        _log_group: &str,
        log_stream: &str,
        next_token: Option<&str>,
        _limit: i32,
    ) -> Result<LogEventsPage, LogStoreError> {
        self.read_calls.fetch_add(1, Ordering::SeqCst);
        if self.missing_streams.iter().any(|s| s == log_stream) {
            return Err(LogStoreError::NotFound(format!(
                "The specified log stream does not exist: {log_stream}"
            )));
        }
        let messages: HashMap<&str, &Vec<String>> = self
            .streams
            .iter()
            .map(|(name, messages)| (name.as_str(), messages))
            .collect();
        let Some(messages) = messages.get(log_stream) else {
            return Err(LogStoreError::NotFound(log_stream.to_string()));
        };

        let page: usize = next_token.map_or(0, |t| t.parse().unwrap());
        let start = (page * self.page_size).min(messages.len());
        let end = (start + self.page_size).min(messages.len());
        let next_forward_token = if start == end {
            next_token.map_or("0".to_string(), str::to_string)
        } else {
            (page + 1).to_string()
        };
        Ok(LogEventsPage {
            events: messages[start..end]
                .iter()
                .map(|m| RawLogEvent::new(m.clone()))
                .collect(),
            next_forward_token: Some(next_forward_token),
        })
    }
}
