//! Per-tick classification and reminder logic.
//!
//! Each tick runs two phases for every subject, against the same `now`:
//!
//! ```text
//!  ┌──────────────────────┐     ┌──────────────────────────┐
//!  │ 1. classify          │     │ 2. remind                │
//!  │ pending detection ─▶ │     │ window closing, nothing  │
//!  │ in_slot / out_slot   │     │ taken this occurrence ─▶ │
//!  │ taken event          │     │ alert event              │
//!  └──────────────────────┘     └──────────────────────────┘
//! ```
//!
//! Classification runs first so the reminder phase sees a detection that
//! arrived just before the tick.

use log::info;

use crate::app::events::{OutboundEvent, SlotClass};
use crate::config::Settings;
use crate::window::{self, TimeOfDay, TimeSlot};

/// Extra gap on top of `reminder_time` between two reminders, absorbing
/// tick jitter.
pub const REMINDER_SLACK_SECS: f64 = 10.0;

/// Classify a detection by the local time it happened at.
pub fn classify(series_base: &str, taken_at: f64, tod: TimeOfDay, slots: &[TimeSlot]) -> OutboundEvent {
    let class = match window::is_within(tod, slots) {
        Some(_) => SlotClass::InSlot,
        None => SlotClass::OutSlot,
    };
    OutboundEvent::taken(series_base, class, taken_at)
}

/// Reminder state for one subject.
#[derive(Debug, Clone, Default)]
pub struct ReminderScheduler {
    last_reminder: f64,
}

impl ReminderScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide whether a reminder is due at `now`.
    ///
    /// * `now_tod`: local time of day for `now`.
    /// * `last_taken`: most recent confirmed detection, if any.
    /// * `label`: subject display name, used in the alert text.
    pub fn evaluate(
        &mut self,
        now: f64,
        now_tod: TimeOfDay,
        last_taken: Option<f64>,
        label: &str,
        settings: &Settings,
    ) -> Option<OutboundEvent> {
        if !settings.reminders {
            return None;
        }
        if now - self.last_reminder <= settings.reminder_time + REMINDER_SLACK_SECS {
            return None;
        }

        let slot = window::is_within(now_tod, &settings.time_slots)?;
        let elapsed = window::seconds_since_start(now_tod, slot);
        let taken_this_window = last_taken.is_some_and(|t| t <= now && now - t <= elapsed);
        if taken_this_window {
            return None;
        }

        let remaining = window::seconds_until_end(now_tod, slot);
        if remaining >= settings.reminder_time {
            return None;
        }

        self.last_reminder = now;
        info!(
            "Reminder: '{}' has not taken {} in '{}' ({:.0}s left)",
            label, settings.medicine_name, slot.name, remaining
        );
        let message = format!(
            "Reminder: {} not yet taken by {} for {}, window closes at {}",
            settings.medicine_name.replace('_', " "),
            label,
            slot.name,
            slot.end
        );
        Some(OutboundEvent::alert(message, now))
    }

    pub fn last_reminder(&self) -> f64 {
        self.last_reminder
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
