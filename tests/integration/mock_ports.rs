//! Mock port adapters for integration tests.
//!
//! The sink records every batch so tests can assert on the full delivery
//! history; the clock maps epoch seconds through a fixed offset so a test
//! can pin any timestamp to any local time of day.

use medmonitor::app::events::OutboundEvent;
use medmonitor::app::ports::{Clock, EventSink};
use medmonitor::error::DispatchError;
use medmonitor::window::TimeOfDay;

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub batches: Vec<(String, Vec<OutboundEvent>)>,
    /// While `true`, every send fails with `Unreachable`.
    pub offline: bool,
    pub failed_attempts: usize,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all_events(&self) -> Vec<OutboundEvent> {
        self.batches.iter().flat_map(|(_, b)| b.clone()).collect()
    }

    pub fn taken_series(&self) -> Vec<String> {
        self.all_events()
            .into_iter()
            .filter_map(|e| match e {
                OutboundEvent::Taken { series_name, .. } => Some(series_name),
                OutboundEvent::Alert { .. } => None,
            })
            .collect()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.all_events()
            .into_iter()
            .filter_map(|e| match e {
                OutboundEvent::Alert { message, .. } => Some(message),
                OutboundEvent::Taken { .. } => None,
            })
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn send_batch(&mut self, subject: &str, events: &[OutboundEvent]) -> Result<(), DispatchError> {
        if self.offline {
            self.failed_attempts += 1;
            return Err(DispatchError::Unreachable);
        }
        self.batches.push((subject.to_string(), events.to_vec()));
        Ok(())
    }
}

// ── OffsetClock ───────────────────────────────────────────────

/// Maps `epoch` to local time `epoch + offset`.
#[derive(Debug, Clone, Copy)]
pub struct OffsetClock {
    pub offset_secs: i32,
}

#[allow(dead_code)]
impl OffsetClock {
    /// Clock under which `epoch` reads as `h:m` local time.
    pub fn pinned(epoch: f64, h: u32, m: u32) -> Self {
        let target = i64::from(h * 3600 + m * 60);
        Self {
            offset_secs: (target - epoch as i64) as i32,
        }
    }

    pub fn utc() -> Self {
        Self { offset_secs: 0 }
    }
}

impl Clock for OffsetClock {
    fn now(&self) -> f64 {
        0.0
    }

    fn time_of_day(&self, epoch_secs: f64) -> Option<TimeOfDay> {
        TimeOfDay::from_epoch(epoch_secs, self.offset_secs)
    }
}
