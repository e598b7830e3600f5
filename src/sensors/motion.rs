//! Pill-box motion detector.
//!
//! ## State machine
//!
//! | State    | Condition                       | Behaviour                             |
//! |----------|---------------------------------|---------------------------------------|
//! | Settling | fewer than `settle_samples` seen | record baseline, never detect        |
//! | Active   | otherwise                       | per-axis delta vs. `accel_min_change` |
//!
//! In `Active`, a movement is confirmed only if more than `ignore_time`
//! seconds have passed since the previous confirmation, so one physical
//! gesture yields one event.  Confirmations queue up until a tick drains
//! them, oldest first, through [`MotionDetector::take_taken`]; each is
//! handed out exactly once.

use heapless::Deque;
use log::warn;

use crate::config::Settings;

use super::{AXES, Sample};

/// Outcome of feeding one sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Detection {
    /// Still capturing the baseline.
    Settling,
    /// No axis moved more than the threshold.
    Still,
    /// Movement seen, but within `ignore_time` of the last detection.
    Debounced,
    /// Movement confirmed at this timestamp.
    Taken(f64),
}

/// Confirmed detections a subject can hold between two ticks.
pub const PENDING_CAPACITY: usize = 16;

#[derive(Debug, Clone, Default)]
pub struct MotionDetector {
    last_axes: [f64; AXES],
    last_taken: Option<f64>,
    /// Confirmations not yet consumed by a tick, oldest first.
    pending: Deque<f64, PENDING_CAPACITY>,
    settle_count: u32,
}

impl MotionDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_sample(&mut self, sample: &Sample, settings: &Settings) -> Detection {
        if self.settle_count < settings.settle_samples {
            self.settle_count += 1;
            self.last_axes = sample.axes;
            return Detection::Settling;
        }

        let moved = sample
            .axes
            .iter()
            .zip(self.last_axes.iter())
            .any(|(now, prev)| (now - prev).abs() > settings.accel_min_change);
        self.last_axes = sample.axes;

        if !moved {
            return Detection::Still;
        }
        if let Some(last) = self.last_taken {
            if sample.timestamp - last <= settings.ignore_time {
                return Detection::Debounced;
            }
        }

        self.last_taken = Some(sample.timestamp);
        if let Err(t) = self.pending.push_back(sample.timestamp) {
            warn!(
                "Detection queue full ({} unconsumed), detection at {:.3} not queued",
                PENDING_CAPACITY, t
            );
        }
        Detection::Taken(sample.timestamp)
    }

    /// Oldest detection not yet consumed by a tick.
    pub fn pending(&self) -> Option<f64> {
        self.pending.front().copied()
    }

    /// Number of detections waiting for a tick.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Consume the oldest pending detection.
    pub fn take_taken(&mut self) -> Option<f64> {
        self.pending.pop_front()
    }

    /// Timestamp of the most recent confirmed detection.
    pub fn last_taken(&self) -> Option<f64> {
        self.last_taken
    }

    pub fn is_settling(&self, settings: &Settings) -> bool {
        self.settle_count < settings.settle_samples
    }
}
