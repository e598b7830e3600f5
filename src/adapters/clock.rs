//! System clock adapter.
//!
//! Wall time comes from `std::time::SystemTime`.  Local time of day is
//! derived with a fixed UTC offset supplied at construction; the host
//! process is expected to pass the site's offset.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::app::ports::Clock;
use crate::window::TimeOfDay;

/// Clock backed by the system's real-time clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
    utc_offset_secs: i32,
}

impl SystemClock {
    /// UTC clock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clock for a site `utc_offset_secs` ahead of UTC.
    pub fn with_offset(utc_offset_secs: i32) -> Self {
        Self { utc_offset_secs }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0.0, |d| d.as_secs_f64())
    }

    fn time_of_day(&self, epoch_secs: f64) -> Option<TimeOfDay> {
        TimeOfDay::from_epoch(epoch_secs, self.utc_offset_secs)
    }
}
