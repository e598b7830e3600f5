//! Port traits: the boundary between the monitor core and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Monitor (domain)
//! ```
//!
//! Driven adapters (event sink, clock, config source) implement these
//! traits.  The [`Monitor`](super::service::Monitor) consumes them via
//! generics, so the domain core never touches the network, the system
//! clock, or the filesystem directly.

use crate::config::MonitorConfig;
use crate::error::{ConfigError, DispatchError};
use crate::window::TimeOfDay;

use super::events::OutboundEvent;

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → data service)
// ───────────────────────────────────────────────────────────────

/// Receives whole batches of outbound events, one call per flush.
///
/// An `Err` leaves the batch queued in the monitor; it is offered again
/// on the next flush attempt.
pub trait EventSink {
    fn send_batch(&mut self, subject: &str, events: &[OutboundEvent]) -> Result<(), DispatchError>;
}

// ───────────────────────────────────────────────────────────────
// Clock port (domain ↔ wall clock / local timezone)
// ───────────────────────────────────────────────────────────────

pub trait Clock {
    /// Current wall time in epoch seconds.
    fn now(&self) -> f64;

    /// Local time of day for an epoch timestamp.  `None` if the clock
    /// cannot map it.
    fn time_of_day(&self, epoch_secs: f64) -> Option<TimeOfDay>;
}

// ───────────────────────────────────────────────────────────────
// Configuration port (config layer → domain)
// ───────────────────────────────────────────────────────────────

/// Loads the monitor configuration.  Validation happens in the monitor.
pub trait ConfigPort {
    fn load(&self) -> Result<MonitorConfig, ConfigError>;
}
