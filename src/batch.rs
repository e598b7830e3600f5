//! Per-subject outbound event batching.
//!
//! The first event queued for an idle subject arms a [`FlushTimer`]
//! `data_send_delay` seconds out; everything queued before it expires
//! leaves in the same batch.  Each subject has its own timer so batches
//! never interleave subjects.
//!
//! ```text
//!  enqueue ──▶ [ e1 e2 e3 ]  timer armed at first enqueue
//!                   │
//!        flush_due(now ≥ due) ──▶ EventSink::send_batch(subject, [e1 e2 e3])
//!                   │
//!            Ok  → cleared, timer disarmed
//!            Err → kept, timer re-armed
//! ```

use std::collections::HashMap;

use log::{debug, warn};

use crate::app::events::OutboundEvent;
use crate::app::ports::EventSink;

/// Handle for a subject's scheduled flush.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlushTimer {
    /// Epoch seconds at which the batch is due.
    pub due_at: f64,
}

#[derive(Debug, Default)]
struct PendingBatch {
    events: Vec<OutboundEvent>,
    timer: Option<FlushTimer>,
}

#[derive(Debug, Default)]
pub struct EventBatcher {
    pending: HashMap<String, PendingBatch>,
}

impl EventBatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an event, arming the subject's timer if it is idle.
    pub fn enqueue(&mut self, subject: &str, event: OutboundEvent, now: f64, delay: f64) {
        let batch = self.pending.entry(subject.to_string()).or_default();
        batch.events.push(event);
        if batch.timer.is_none() {
            batch.timer = Some(FlushTimer { due_at: now + delay });
            debug!("Batch[{}]: flush scheduled in {:.1}s", subject, delay);
        }
    }

    /// Flush every batch whose timer has expired.  Returns the number of
    /// batches delivered.
    pub fn flush_due(&mut self, now: f64, delay: f64, sink: &mut impl EventSink) -> usize {
        let mut delivered = 0;
        for (subject, batch) in &mut self.pending {
            let due = batch.timer.is_some_and(|t| t.due_at <= now);
            if !due {
                continue;
            }
            if Self::send(subject, batch, sink) {
                delivered += 1;
            } else {
                batch.timer = Some(FlushTimer { due_at: now + delay });
            }
        }
        self.pending.retain(|_, b| !b.events.is_empty());
        delivered
    }

    /// Flush one subject now, regardless of its timer.
    pub fn flush(&mut self, subject: &str, sink: &mut impl EventSink) -> bool {
        let Some(batch) = self.pending.get_mut(subject) else {
            return false;
        };
        let sent = Self::send(subject, batch, sink);
        if sent {
            self.pending.remove(subject);
        }
        sent
    }

    /// Flush every subject now.  Returns the number of batches delivered.
    pub fn flush_all(&mut self, sink: &mut impl EventSink) -> usize {
        let subjects: Vec<String> = self.pending.keys().cloned().collect();
        let mut delivered = 0;
        for subject in &subjects {
            if self.flush(subject, &mut *sink) {
                delivered += 1;
            }
        }
        delivered
    }

    /// Cancel a subject's timer and drop its pending events.
    pub fn cancel(&mut self, subject: &str) {
        if let Some(batch) = self.pending.remove(subject) {
            if !batch.events.is_empty() {
                debug!(
                    "Batch[{}]: cancelled, {} event(s) discarded",
                    subject,
                    batch.events.len()
                );
            }
        }
    }

    /// Earliest armed timer across all subjects.
    pub fn next_due(&self) -> Option<f64> {
        self.pending
            .values()
            .filter_map(|b| b.timer.map(|t| t.due_at))
            .min_by(f64::total_cmp)
    }

    pub fn timer(&self, subject: &str) -> Option<FlushTimer> {
        self.pending.get(subject).and_then(|b| b.timer)
    }

    pub fn pending(&self, subject: &str) -> &[OutboundEvent] {
        match self.pending.get(subject) {
            Some(b) => &b.events,
            None => &[],
        }
    }

    // ── Internal ──────────────────────────────────────────────

    fn send(subject: &str, batch: &mut PendingBatch, sink: &mut impl EventSink) -> bool {
        match sink.send_batch(subject, &batch.events) {
            Ok(()) => {
                debug!("Batch[{}]: sent {} event(s)", subject, batch.events.len());
                batch.events.clear();
                batch.timer = None;
                true
            }
            Err(e) => {
                warn!(
                    "Batch[{}]: send failed ({}), keeping {} event(s) for retry",
                    subject,
                    e,
                    batch.events.len()
                );
                false
            }
        }
    }
}
