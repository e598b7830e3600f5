//! Monitor configuration.
//!
//! [`MonitorConfig`] is the raw, serde-facing shape that arrives from the
//! config layer (local JSON file or a remote config message).
//! [`MonitorConfig::validate`] turns it into a [`Settings`] snapshot with
//! parsed windows; components only ever read a `Settings`.  A reload
//! builds a new snapshot and swaps it in whole.

use log::warn;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::window::TimeSlot;

/// Maximum number of configured time slots.
pub const MAX_TIME_SLOTS: usize = 8;

/// A time slot as written in config: `HH:MM` strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlotConfig {
    pub name: String,
    pub start: String,
    pub end: String,
}

impl TimeSlotConfig {
    pub fn new(name: &str, start: &str, end: &str) -> Self {
        Self {
            name: name.to_string(),
            start: start.to_string(),
            end: end.to_string(),
        }
    }
}

/// Raw monitor configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Master switch for movement detection.
    #[serde(deserialize_with = "deserialize_flag")]
    pub medicine: bool,
    /// Medicine name used in reminder text.
    pub medicine_name: String,
    /// Ordered daily windows.  First match wins.
    #[serde(deserialize_with = "deserialize_slots")]
    pub time_slots: Vec<TimeSlotConfig>,
    /// Whether reminder alerts are sent.
    #[serde(deserialize_with = "deserialize_flag")]
    pub reminders: bool,
    /// Lead time before a window closes at which a reminder fires (seconds).
    pub reminder_time: f64,
    /// Minimum change in g on any axis that counts as movement.
    pub accel_min_change: f64,
    /// Movement within this interval of the last detection is ignored (seconds).
    pub ignore_time: f64,
    /// Delay before a pending batch is flushed (seconds).
    pub data_send_delay: f64,
    /// Number of initial samples used as baseline per subject.
    pub settle_samples: u32,
    /// Period of the classification/reminder tick (seconds).
    pub tick_interval: f64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            medicine: true,
            medicine_name: "My_Medicine".to_string(),
            time_slots: vec![
                TimeSlotConfig::new("Morning", "07:00", "08:00"),
                TimeSlotConfig::new("Evening", "21:00", "22:00"),
            ],
            reminders: true,
            reminder_time: 900.0,
            accel_min_change: 0.2,
            ignore_time: 120.0,
            data_send_delay: 1.0,
            settle_samples: 3,
            tick_interval: 5.0,
        }
    }
}

/// Validated, immutable configuration snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub medicine: bool,
    pub medicine_name: String,
    pub time_slots: heapless::Vec<TimeSlot, MAX_TIME_SLOTS>,
    pub reminders: bool,
    pub reminder_time: f64,
    pub accel_min_change: f64,
    pub ignore_time: f64,
    pub data_send_delay: f64,
    pub settle_samples: u32,
    pub tick_interval: f64,
}

impl MonitorConfig {
    /// Parse a JSON document.  Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Corrupted(e.to_string()))
    }

    /// Range-check every field and parse the windows.
    pub fn validate(&self) -> Result<Settings, ConfigError> {
        let mut time_slots = heapless::Vec::new();
        for slot in &self.time_slots {
            let parsed = TimeSlot::parse(&slot.name, &slot.start, &slot.end)?;
            time_slots
                .push(parsed)
                .map_err(|_| ConfigError::TooManySlots(self.time_slots.len()))?;
        }

        if !(self.accel_min_change.is_finite() && self.accel_min_change > 0.0) {
            return Err(ConfigError::ValidationFailed(
                "accel_min_change must be a positive number",
            ));
        }
        if !(self.ignore_time.is_finite() && self.ignore_time >= 0.0) {
            return Err(ConfigError::ValidationFailed(
                "ignore_time must be zero or positive",
            ));
        }
        if !(self.reminder_time.is_finite() && self.reminder_time > 0.0) {
            return Err(ConfigError::ValidationFailed(
                "reminder_time must be positive",
            ));
        }
        if !(self.data_send_delay.is_finite() && self.data_send_delay >= 0.0) {
            return Err(ConfigError::ValidationFailed(
                "data_send_delay must be zero or positive",
            ));
        }
        if !(self.tick_interval.is_finite() && self.tick_interval > 0.0) {
            return Err(ConfigError::ValidationFailed(
                "tick_interval must be positive",
            ));
        }

        Ok(Settings {
            medicine: self.medicine,
            medicine_name: self.medicine_name.clone(),
            time_slots,
            reminders: self.reminders,
            reminder_time: self.reminder_time,
            accel_min_change: self.accel_min_change,
            ignore_time: self.ignore_time,
            data_send_delay: self.data_send_delay,
            settle_samples: self.settle_samples,
            tick_interval: self.tick_interval,
        })
    }
}

/// A config message pushed by the remote config service.
#[derive(Debug, Clone)]
pub enum ConfigMessage {
    /// A full replacement configuration.
    Update(Box<MonitorConfig>),
    /// The service reported a problem instead of sending config.
    Warning(serde_json::Value),
}

impl ConfigMessage {
    /// Parse the `config` payload of a remote message.
    pub fn parse(json: &str) -> Result<Self, ConfigError> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| ConfigError::Corrupted(e.to_string()))?;
        if let Some(w) = value.get("warning") {
            warn!("Config service warning: {}", w);
            return Ok(Self::Warning(w.clone()));
        }
        let config =
            serde_json::from_value(value).map_err(|e| ConfigError::Corrupted(e.to_string()))?;
        Ok(Self::Update(Box::new(config)))
    }
}

// ── Lenient field decoding ────────────────────────────────────

/// Booleans may arrive as JSON bools, 0/1, or the strings
/// `true/t/1` and `false/f/0` in any case.
fn deserialize_flag<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
        Text(String),
    }

    match Flag::deserialize(d)? {
        Flag::Bool(b) => Ok(b),
        Flag::Int(1) => Ok(true),
        Flag::Int(0) => Ok(false),
        Flag::Int(n) => Err(de::Error::custom(format!("{n} is not a boolean"))),
        Flag::Text(s) => match s.to_ascii_lowercase().as_str() {
            "true" | "t" | "1" => Ok(true),
            "false" | "f" | "0" => Ok(false),
            _ => Err(de::Error::custom(format!("'{s}' is not a boolean"))),
        },
    }
}

/// Slots may be a flat list or the legacy form: a list of lists.
fn deserialize_slots<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<TimeSlotConfig>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Slots {
        Flat(Vec<TimeSlotConfig>),
        Nested(Vec<Vec<TimeSlotConfig>>),
    }

    Ok(match Slots::deserialize(d)? {
        Slots::Flat(v) => v,
        Slots::Nested(v) => v.into_iter().flatten().collect(),
    })
}
