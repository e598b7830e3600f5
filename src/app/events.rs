//! Outbound events.
//!
//! The [`Monitor`](super::service::Monitor) queues these per subject and
//! hands whole batches to the [`EventSink`](super::ports::EventSink) port.
//! The serialised shape is the wire contract with the data service and
//! must not change.

use serde::{Deserialize, Serialize};

/// Whether a detection fell inside a configured window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotClass {
    InSlot,
    OutSlot,
}

impl SlotClass {
    /// Series-name suffix.
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::InSlot => "in_slot",
            Self::OutSlot => "out_slot",
        }
    }
}

/// A single outbound event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OutboundEvent {
    /// A classified "medicine taken" detection.
    #[serde(rename_all = "camelCase")]
    Taken {
        series_name: String,
        timestamp_millis: i64,
        value: u8,
    },
    /// A reminder that a window is closing without a detection.
    Alert { message: String, timestamp: f64 },
}

impl OutboundEvent {
    /// Build a taken event for `{series_base}/{in_slot|out_slot}`.
    pub fn taken(series_base: &str, class: SlotClass, taken_at: f64) -> Self {
        Self::Taken {
            series_name: format!("{}/{}", series_base, class.suffix()),
            timestamp_millis: (taken_at * 1000.0) as i64,
            value: 1,
        }
    }

    pub fn alert(message: String, timestamp: f64) -> Self {
        Self::Alert { message, timestamp }
    }
}

/// Batch envelope sent to the data service: `{"m": "data", "d": [...]}`.
#[derive(Debug, Serialize)]
pub struct DataMessage<'a> {
    m: &'static str,
    d: &'a [OutboundEvent],
}

impl<'a> DataMessage<'a> {
    pub fn new(events: &'a [OutboundEvent]) -> Self {
        Self { m: "data", d: events }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
