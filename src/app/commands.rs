//! Inbound commands to the monitor.
//!
//! These are what the sensor and adaptor layers send into the
//! [`Monitor`](super::service::Monitor), either directly through
//! [`Monitor::handle`](super::service::Monitor::handle) or over the
//! runtime's input channel.

use crate::config::MonitorConfig;

#[derive(Debug, Clone)]
pub enum MonitorInput {
    /// A raw acceleration sample.  Validated on arrival.
    Sample {
        subject: String,
        timestamp: f64,
        axes: Vec<f64>,
    },

    /// A sensor was bound to a subject.
    Register {
        subject: String,
        display_name: String,
    },

    /// A sensor was unbound.
    Deregister { subject: String },

    /// Hot-reload configuration.
    Reload(Box<MonitorConfig>),

    /// Stop the runtime loop.
    Shutdown,
}
