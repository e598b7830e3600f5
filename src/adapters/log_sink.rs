//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by rendering each batch as the JSON data
//! message the data service expects and writing it to the log.  A network
//! client would implement the same trait.

use log::info;

use crate::app::events::{DataMessage, OutboundEvent};
use crate::app::ports::EventSink;
use crate::error::DispatchError;

/// Adapter that logs every batch as one JSON line.
#[derive(Debug, Default)]
pub struct LogEventSink {
    sent: usize,
}

impl LogEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of batches written so far.
    pub fn sent(&self) -> usize {
        self.sent
    }
}

impl EventSink for LogEventSink {
    fn send_batch(&mut self, subject: &str, events: &[OutboundEvent]) -> Result<(), DispatchError> {
        let json = DataMessage::new(events)
            .to_json()
            .map_err(|e| DispatchError::Encode(e.to_string()))?;
        info!("DATA | {} | {}", subject, json);
        self.sent += 1;
        Ok(())
    }
}
