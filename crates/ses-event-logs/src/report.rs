// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! One report request, from query string to classified records.

use std::collections::HashMap;

use tracing::info;

use crate::date::{self, DateFormatError};
use crate::event_classifier::{self, ClassifiedEvents};
use crate::log_fetcher::{self, FetchLimits};
use crate::log_store::{LogStore, LogStoreError};
use crate::ses_event::{EventKind, UnknownEventKind};
use crate::stream_selector::{self, SelectError};

const LOG_GROUP_PARAM: &str = "log-group";
const START_DATE_PARAM: &str = "start-date";
const END_DATE_PARAM: &str = "end-date";
const EVENT_TYPE_PARAM: &str = "event-type";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    #[error("Missing required parameters")]
    MissingParameters,
    #[error(transparent)]
    InvalidDate(#[from] DateFormatError),
    #[error(transparent)]
    InvalidEventType(#[from] UnknownEventKind),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReportError {
    #[error(transparent)]
    InvalidRequest(#[from] RequestError),
    #[error("Failed to list log streams: {0}")]
    StreamListing(LogStoreError),
}

impl From<SelectError> for ReportError {
    fn from(err: SelectError) -> Self {
        match err {
            SelectError::InvalidDate(err) => ReportError::InvalidRequest(err.into()),
            SelectError::Listing(err) => ReportError::StreamListing(err),
        }
    }
}

/// A validated report request. Dates are kept as sent (`yyyy-mm-dd`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRequest {
    pub log_group: String,
    pub start_date: String,
    pub end_date: String,
    pub event_kind: EventKind,
}

impl ReportRequest {
    /// Builds a request from a raw (form-encoded) query string.
    ///
    /// Presence of all four parameters is checked before anything else, so a request missing
    /// one is rejected with [`RequestError::MissingParameters`] whatever the other values are.
    /// A repeated parameter keeps its first value.
    pub fn from_query(query: Option<&str>) -> Result<Self, RequestError> {
        let mut params: HashMap<String, String> = HashMap::new();
        if let Some(query) = query {
            for (name, value) in form_urlencoded::parse(query.as_bytes()).into_owned() {
                params.entry(name).or_insert(value);
            }
        }
        let param = |name: &str| params.get(name).filter(|value| !value.is_empty());

        let (Some(log_group), Some(start_date), Some(end_date), Some(event_type)) = (
            param(LOG_GROUP_PARAM),
            param(START_DATE_PARAM),
            param(END_DATE_PARAM),
            param(EVENT_TYPE_PARAM),
        ) else {
            return Err(RequestError::MissingParameters);
        };

        Ok(ReportRequest {
            log_group: log_group.clone(),
            start_date: start_date.clone(),
            end_date: end_date.clone(),
            event_kind: event_type.parse()?,
        })
    }
}

/// Selects the streams of the requested range, reads them and classifies their events.
pub async fn build_report(
    store: &(dyn LogStore + Send + Sync),
    request: &ReportRequest,
    limits: FetchLimits,
) -> Result<ClassifiedEvents, ReportError> {
    let start_date = date::convert_date_format(&request.start_date).map_err(RequestError::from)?;
    let end_date = date::convert_date_format(&request.end_date).map_err(RequestError::from)?;

    let streams =
        stream_selector::select_streams(store, &request.log_group, &start_date, &end_date).await?;
    let fetched = log_fetcher::fetch_events(store, &request.log_group, &streams, limits).await;
    let (classified, stats) = event_classifier::classify(&fetched.events, request.event_kind);

    info!(
        "Report for {} ({} to {}, {}): {} streams selected, {} skipped, {} events read, {} malformed, {} records",
        request.log_group,
        start_date,
        end_date,
        request.event_kind,
        streams.len(),
        fetched.skipped_partitions(),
        fetched.events.len(),
        stats.malformed,
        stats.emitted
    );
    Ok(classified)
}
