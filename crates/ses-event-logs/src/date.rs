// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Date handling for report requests and date-encoded stream names.
//!
//! Two textual forms are in play: requests carry `yyyy-mm-dd`, while the stream
//! selector works on `yyyy/mm/dd` bounds. Both are parsed into [`NaiveDate`]
//! before any comparison so they are never compared as raw strings.

use chrono::NaiveDate;

const DASH_FORMAT: &str = "%Y-%m-%d";
const SLASH_FORMAT: &str = "%Y/%m/%d";
/// Length of `yyyy-mm-dd` / `yyyy/mm/dd`.
const DATE_LEN: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid date '{value}': expected {expected}")]
pub struct DateFormatError {
    pub value: String,
    pub expected: &'static str,
}

impl DateFormatError {
    fn new(value: &str, expected: &'static str) -> Self {
        DateFormatError {
            value: value.to_string(),
            expected,
        }
    }
}

/// Reformats a strict `yyyy-mm-dd` date as `yyyy/mm/dd`.
pub fn convert_date_format(date: &str) -> Result<String, DateFormatError> {
    let parsed = parse_strict(date, DASH_FORMAT, b'-')
        .ok_or_else(|| DateFormatError::new(date, "yyyy-mm-dd"))?;
    Ok(parsed.format(SLASH_FORMAT).to_string())
}

/// Parses a strict `yyyy/mm/dd` date.
pub fn parse_slash_date(date: &str) -> Result<NaiveDate, DateFormatError> {
    parse_strict(date, SLASH_FORMAT, b'/').ok_or_else(|| DateFormatError::new(date, "yyyy/mm/dd"))
}

/// Returns the date a stream name starts with, if any.
///
/// Stream names are expected to begin with `yyyy-mm-dd` (e.g. `2024-01-05-a`); the
/// Lambda-style `yyyy/mm/dd` prefix (e.g. `2024/01/05/[$LATEST]abc`) is accepted too.
pub fn stream_name_date(name: &str) -> Option<NaiveDate> {
    let prefix = name.get(..DATE_LEN)?;
    parse_strict(prefix, DASH_FORMAT, b'-').or_else(|| parse_strict(prefix, SLASH_FORMAT, b'/'))
}

/// chrono accepts unpadded fields ("2024-1-5"), so the shape is checked byte by byte first.
fn parse_strict(value: &str, format: &str, separator: u8) -> Option<NaiveDate> {
    let bytes = value.as_bytes();
    if bytes.len() != DATE_LEN {
        return None;
    }
    let well_formed = bytes.iter().enumerate().all(|(i, b)| match i {
        4 | 7 => *b == separator,
        _ => b.is_ascii_digit(),
    });
    if !well_formed {
        return None;
    }
    NaiveDate::parse_from_str(value, format).ok()
}

/// Inclusive calendar date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateRange { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}
