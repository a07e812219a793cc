// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Typed view of the SES event publishing payloads written to CloudWatch Logs.
//!
//! Only the fields the reports read are modelled. Every kind-specific sub-object is
//! optional because SES does not guarantee it is present for its `eventType`.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

const CALLER_IDENTITY_TAG: &str = "ses:caller-identity";
pub const UNKNOWN_CALLER_IDENTITY: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Bounce,
    Delivery,
    Complaint,
    Open,
    Send,
}

impl EventKind {
    pub const ALL: [EventKind; 5] = [
        EventKind::Bounce,
        EventKind::Delivery,
        EventKind::Complaint,
        EventKind::Open,
        EventKind::Send,
    ];

    /// Label used in the `event-type` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Bounce => "bounce",
            EventKind::Delivery => "delivery",
            EventKind::Complaint => "complaint",
            EventKind::Open => "open",
            EventKind::Send => "send",
        }
    }

    /// Value of `eventType` in the SES payload.
    pub fn event_type(&self) -> &'static str {
        match self {
            EventKind::Bounce => "Bounce",
            EventKind::Delivery => "Delivery",
            EventKind::Complaint => "Complaint",
            EventKind::Open => "Open",
            EventKind::Send => "Send",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid event type '{0}': expected one of bounce, delivery, complaint, open, send")]
pub struct UnknownEventKind(pub String);

impl FromStr for EventKind {
    type Err = UnknownEventKind;

    /// Case-sensitive: `Bounce` is not a valid request label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownEventKind(s.to_string()))
    }
}

/// An SES event, discriminated on `eventType`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "eventType")]
pub enum SesEvent {
    Bounce {
        mail: Mail,
        bounce: Option<Bounce>,
    },
    Delivery {
        mail: Mail,
        delivery: Option<Delivery>,
    },
    Complaint {
        mail: Mail,
        complaint: Option<Complaint>,
    },
    Open {
        mail: Mail,
        open: Option<Open>,
    },
    Send {
        mail: Mail,
        #[serde(default, deserialize_with = "deserialize_present")]
        send: Option<serde_json::Value>,
    },
    /// Click, Reject, DeliveryDelay, Rendering Failure, Subscription, ...
    #[serde(other)]
    Other,
}

impl SesEvent {
    pub fn kind(&self) -> Option<EventKind> {
        match self {
            SesEvent::Bounce { .. } => Some(EventKind::Bounce),
            SesEvent::Delivery { .. } => Some(EventKind::Delivery),
            SesEvent::Complaint { .. } => Some(EventKind::Complaint),
            SesEvent::Open { .. } => Some(EventKind::Open),
            SesEvent::Send { .. } => Some(EventKind::Send),
            SesEvent::Other => None,
        }
    }
}

/// A present key is `Some`, even when its value is `null`.
fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<serde_json::Value>, D::Error>
where
    D: Deserializer<'de>,
{
    serde_json::Value::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Mail {
    pub source: String,
    pub timestamp: String,
    #[serde(default)]
    pub destination: Vec<String>,
    #[serde(default)]
    pub tags: HashMap<String, Vec<String>>,
}

impl Mail {
    /// First value of the `ses:caller-identity` tag, `"Unknown"` when absent or empty.
    pub fn caller_identity(&self) -> &str {
        self.tags
            .get(CALLER_IDENTITY_TAG)
            .and_then(|values| values.first())
            .map_or(UNKNOWN_CALLER_IDENTITY, String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounce {
    pub bounce_type: String,
    pub timestamp: String,
    pub bounced_recipients: Vec<BouncedRecipient>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BouncedRecipient {
    pub email_address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Delivery {
    pub recipients: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Complaint {
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Open {
    pub timestamp: String,
}
