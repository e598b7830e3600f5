//! Error types for the medicine monitor.
//!
//! Only [`ConfigError`] is ever fatal, and only while loading or reloading
//! configuration.  Sample, tick and dispatch errors are recovered where
//! they occur: logged at `warn` and the monitor keeps running.

use core::fmt;

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Stored config could not be deserialised.
    Corrupted(String),
    /// Underlying storage could not be read.
    IoError(String),
    /// A time-of-day string is not `HH:MM` (24-hour).
    InvalidTimeOfDay(String),
    /// A window starts and ends at the same minute.
    EmptyWindow(String),
    /// More windows than [`MAX_TIME_SLOTS`](crate::config::MAX_TIME_SLOTS).
    TooManySlots(usize),
    /// A field failed range validation.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Corrupted(msg) => write!(f, "config corrupted: {msg}"),
            Self::IoError(msg) => write!(f, "I/O error: {msg}"),
            Self::InvalidTimeOfDay(s) => write!(f, "invalid time of day '{s}' (expected HH:MM)"),
            Self::EmptyWindow(name) => write!(f, "time slot '{name}' has identical start and end"),
            Self::TooManySlots(n) => write!(f, "{n} time slots configured, too many"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Sample errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SampleError {
    /// Acceleration data did not carry exactly three axes.
    AxisCount(usize),
    /// An axis value is NaN or infinite.
    NonFinite { axis: usize },
    /// The timestamp is NaN or infinite.
    BadTimestamp,
}

impl fmt::Display for SampleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AxisCount(n) => write!(f, "expected 3 axes, got {n}"),
            Self::NonFinite { axis } => write!(f, "axis {axis} is not a finite number"),
            Self::BadTimestamp => write!(f, "timestamp is not a finite number"),
        }
    }
}

impl std::error::Error for SampleError {}

// ---------------------------------------------------------------------------
// Tick errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickError {
    /// The clock could not map an epoch timestamp to a local time of day.
    UnmappableTime(f64),
}

impl fmt::Display for TickError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnmappableTime(t) => write!(f, "cannot map timestamp {t} to time of day"),
        }
    }
}

impl std::error::Error for TickError {}

// ---------------------------------------------------------------------------
// Dispatch errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// The sink is not reachable right now.
    Unreachable,
    /// The batch could not be encoded for the wire.
    Encode(String),
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreachable => write!(f, "sink unreachable"),
            Self::Encode(msg) => write!(f, "encode failed: {msg}"),
        }
    }
}

impl std::error::Error for DispatchError {}
