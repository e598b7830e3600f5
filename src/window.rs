//! Daily time windows ("slots") and the matcher that classifies a
//! time of day against them.
//!
//! A window is the half-open interval `[start, end)` on a 24-hour clock.
//! When `end < start` the window wraps midnight, e.g. `22:00–02:00`
//! contains 23:30 and 01:15 but not 02:00.

use core::fmt;

use crate::error::ConfigError;

/// Seconds in one day.
pub const SECS_PER_DAY: u32 = 86_400;

/// Local time of day, stored as seconds since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay {
    secs: u32,
}

impl TimeOfDay {
    /// Build from seconds since midnight, wrapping values of a day or more.
    pub const fn from_secs(secs: u32) -> Self {
        Self {
            secs: secs % SECS_PER_DAY,
        }
    }

    /// Build from hours and minutes.  Returns `None` out of range.
    pub const fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        if hour > 23 || minute > 59 {
            return None;
        }
        Some(Self {
            secs: hour * 3600 + minute * 60,
        })
    }

    /// Map an epoch timestamp to local time of day, given the local offset
    /// from UTC in seconds.  `None` for NaN or infinite timestamps.
    pub fn from_epoch(epoch_secs: f64, utc_offset_secs: i32) -> Option<Self> {
        if !epoch_secs.is_finite() {
            return None;
        }
        let local = epoch_secs + f64::from(utc_offset_secs);
        let secs = local.rem_euclid(f64::from(SECS_PER_DAY)).floor() as u32;
        Some(Self::from_secs(secs))
    }

    /// Parse a 24-hour `HH:MM` string.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidTimeOfDay(s.to_string());
        let (h, m) = s.trim().split_once(':').ok_or_else(invalid)?;

        let all_digits = |p: &str| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(h) || h.len() > 2 || !all_digits(m) || m.len() != 2 {
            return Err(invalid());
        }

        let hour: u32 = h.parse().map_err(|_| invalid())?;
        let minute: u32 = m.parse().map_err(|_| invalid())?;
        Self::from_hm(hour, minute).ok_or_else(invalid)
    }

    pub const fn secs(self) -> u32 {
        self.secs
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.secs / 3600, (self.secs % 3600) / 60)
    }
}

/// A named daily window during which medicine is expected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSlot {
    pub name: String,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl TimeSlot {
    /// Parse a slot from its config strings.  Rejects empty windows.
    pub fn parse(name: &str, start: &str, end: &str) -> Result<Self, ConfigError> {
        let start = TimeOfDay::parse(start)?;
        let end = TimeOfDay::parse(end)?;
        if start == end {
            return Err(ConfigError::EmptyWindow(name.to_string()));
        }
        Ok(Self {
            name: name.to_string(),
            start,
            end,
        })
    }

    /// True when the window wraps midnight.
    pub fn wraps(&self) -> bool {
        self.end < self.start
    }

    /// Half-open membership test.
    pub fn contains(&self, t: TimeOfDay) -> bool {
        if self.wraps() {
            t >= self.start || t < self.end
        } else {
            t >= self.start && t < self.end
        }
    }

    /// Length of the window in seconds.
    pub fn duration_secs(&self) -> u32 {
        (self.end.secs + SECS_PER_DAY - self.start.secs) % SECS_PER_DAY
    }
}

/// First window containing `t`, scanning in configuration order.
pub fn is_within(t: TimeOfDay, slots: &[TimeSlot]) -> Option<&TimeSlot> {
    slots.iter().find(|slot| slot.contains(t))
}

/// Signed seconds from `t` to the end of `slot`.
///
/// For a wrapping window evaluated before midnight the end lies on the
/// next day.  For a non-wrapping window evaluated after its end the
/// result is negative.
pub fn seconds_until_end(t: TimeOfDay, slot: &TimeSlot) -> f64 {
    let mut end = f64::from(slot.end.secs);
    let now = f64::from(t.secs);
    if slot.wraps() && t >= slot.start {
        end += f64::from(SECS_PER_DAY);
    }
    end - now
}

/// Seconds elapsed since the start of the current occurrence of `slot`.
/// Only meaningful when `slot.contains(t)`.
pub fn seconds_since_start(t: TimeOfDay, slot: &TimeSlot) -> f64 {
    f64::from((t.secs + SECS_PER_DAY - slot.start.secs) % SECS_PER_DAY)
}
