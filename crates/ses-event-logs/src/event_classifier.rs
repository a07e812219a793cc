// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use serde::Serialize;
use tracing::debug;

use crate::log_store::RawLogEvent;
use crate::ses_event::{EventKind, SesEvent};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BounceRecord {
    pub timestamp: String,
    pub source_email: String,
    pub bounced_email: String,
    pub bounce_type: String,
    pub ses_caller_identity: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryRecord {
    pub timestamp: String,
    pub source_email: String,
    pub destination: String,
    pub ses_caller_identity: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComplaintRecord {
    pub date: String,
    pub complaint_source: String,
    pub ses_caller_identity: String,
}

/// Opens carry no caller identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpenRecord {
    pub date: String,
    pub open_source: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendRecord {
    pub date: String,
    pub source_email: String,
    pub destination: String,
    pub ses_caller_identity: String,
}

/// Response body of a report: every list is always serialized, empty or not.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClassifiedEvents {
    pub bounce_data: Vec<BounceRecord>,
    pub delivery_data: Vec<DeliveryRecord>,
    pub complaint_data: Vec<ComplaintRecord>,
    pub open_data: Vec<OpenRecord>,
    pub send_data: Vec<SendRecord>,
}

impl ClassifiedEvents {
    pub fn len(&self) -> usize {
        self.bounce_data.len()
            + self.delivery_data.len()
            + self.complaint_data.len()
            + self.open_data.len()
            + self.send_data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Counters for one classification pass, for logging only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassificationStats {
    /// Events whose message decoded into an SES event.
    pub decoded: usize,
    /// Events skipped because the message was not a well-formed SES event.
    pub malformed: usize,
    /// Decoded events of the requested kind with their detail object present.
    pub matched: usize,
    /// Records produced after fan-out.
    pub emitted: usize,
}

/// Turns raw log events into report records of `requested` kind.
///
/// Records follow the order of `events`, then the order of recipients/destinations inside
/// each payload. Undecodable messages and events of other kinds are skipped.
pub fn classify(
    events: &[RawLogEvent],
    requested: EventKind,
) -> (ClassifiedEvents, ClassificationStats) {
    let mut classified = ClassifiedEvents::default();
    let mut stats = ClassificationStats::default();

    for event in events {
        let ses_event = match serde_json::from_str::<SesEvent>(&event.message) {
            Ok(ses_event) => ses_event,
            Err(err) => {
                debug!("Skipping log event that is not an SES event: {err}");
                stats.malformed += 1;
                continue;
            }
        };
        stats.decoded += 1;
        if ses_event.kind() != Some(requested) {
            continue;
        }
        if push_records(&mut classified, ses_event) {
            stats.matched += 1;
        }
    }

    stats.emitted = classified.len();
    (classified, stats)
}

/// Returns false when the kind-specific detail object is missing.
fn push_records(classified: &mut ClassifiedEvents, ses_event: SesEvent) -> bool {
    match ses_event {
        SesEvent::Bounce {
            mail,
            bounce: Some(bounce),
        } => {
            let identity = mail.caller_identity();
            for recipient in bounce.bounced_recipients {
                classified.bounce_data.push(BounceRecord {
                    timestamp: bounce.timestamp.clone(),
                    source_email: mail.source.clone(),
                    bounced_email: recipient.email_address,
                    bounce_type: bounce.bounce_type.clone(),
                    ses_caller_identity: identity.to_string(),
                });
            }
        }
        SesEvent::Delivery {
            mail,
            delivery: Some(delivery),
        } => {
            let identity = mail.caller_identity();
            for destination in delivery.recipients {
                classified.delivery_data.push(DeliveryRecord {
                    timestamp: mail.timestamp.clone(),
                    source_email: mail.source.clone(),
                    destination,
                    ses_caller_identity: identity.to_string(),
                });
            }
        }
        SesEvent::Complaint {
            mail,
            complaint: Some(complaint),
        } => {
            classified.complaint_data.push(ComplaintRecord {
                date: complaint.timestamp,
                ses_caller_identity: mail.caller_identity().to_string(),
                complaint_source: mail.source,
            });
        }
        SesEvent::Open {
            mail,
            open: Some(open),
        } => {
            classified.open_data.push(OpenRecord {
                date: open.timestamp,
                open_source: mail.source,
            });
        }
        SesEvent::Send {
            mail,
            send: Some(_),
        } => {
            let identity = mail.caller_identity();
            for destination in &mail.destination {
                classified.send_data.push(SendRecord {
                    date: mail.timestamp.clone(),
                    source_email: mail.source.clone(),
                    destination: destination.clone(),
                    ses_caller_identity: identity.to_string(),
                });
            }
        }
        _ => return false,
    }
    true
}
