// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use tracing::debug;

use crate::date::{self, DateFormatError, DateRange};
use crate::log_store::{LogStore, LogStoreError, LogStreamDescriptor};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectError {
    #[error(transparent)]
    InvalidDate(#[from] DateFormatError),
    #[error("Failed to list log streams: {0}")]
    Listing(#[from] LogStoreError),
}

/// Returns the streams of `log_group` whose name starts with a date inside
/// `[start_date, end_date]`, both given as `yyyy/mm/dd`.
///
/// Only the first page of the listing is considered. Names keep the listing order
/// (descending by name).
pub async fn select_streams(
    store: &(dyn LogStore + Send + Sync),
    log_group: &str,
    start_date: &str,
    end_date: &str,
) -> Result<Vec<String>, SelectError> {
    let range = DateRange::new(
        date::parse_slash_date(start_date)?,
        date::parse_slash_date(end_date)?,
    );

    let descriptors = store.describe_log_streams(log_group).await?;
    let selected = filter_streams(descriptors, range);
    debug!(
        "Selected {} log streams in {log_group} between {start_date} and {end_date}",
        selected.len()
    );
    Ok(selected)
}

fn filter_streams(descriptors: Vec<LogStreamDescriptor>, range: DateRange) -> Vec<String> {
    descriptors
        .into_iter()
        .filter(|descriptor| {
            date::stream_name_date(&descriptor.name).is_some_and(|day| range.contains(day))
        })
        .map(|descriptor| descriptor.name)
        .collect()
}
