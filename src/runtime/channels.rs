//! Inbound channel between the sensor/adaptor layers and the monitor loop.
//!
//! A bounded `embassy-sync` MPMC channel.  Any thread may submit through a
//! [`MonitorHandle`]; the monitor loop is the only receiver, so inputs
//! are applied in the order they were sent.
//!
//! ```text
//! ┌──────────────┐  MonitorInput  ┌──────────────┐
//! │ sensor feed  │───────────────▶│ monitor loop │
//! │ adaptor mgr  │                │  (async)     │
//! └──────────────┘                └──────────────┘
//! ```

use std::sync::Arc;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use log::warn;

use crate::app::commands::MonitorInput;
use crate::config::MonitorConfig;

/// Channel depth for inbound inputs.
pub const INPUT_DEPTH: usize = 64;

pub type InputChannel = Channel<CriticalSectionRawMutex, MonitorInput, INPUT_DEPTH>;

/// Cloneable sender side of the monitor loop.
#[derive(Clone)]
pub struct MonitorHandle {
    channel: Arc<InputChannel>,
}

impl Default for MonitorHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl MonitorHandle {
    pub fn new() -> Self {
        Self {
            channel: Arc::new(Channel::new()),
        }
    }

    pub(crate) fn channel(&self) -> Arc<InputChannel> {
        Arc::clone(&self.channel)
    }

    /// Queue an input without blocking.  Returns `false` if the channel is
    /// full and the input was dropped.
    pub fn submit(&self, input: MonitorInput) -> bool {
        if self.channel.try_send(input).is_err() {
            warn!("Monitor input channel full, dropping input");
            return false;
        }
        true
    }

    pub fn notify_sample(&self, subject: &str, timestamp: f64, axes: &[f64]) -> bool {
        self.submit(MonitorInput::Sample {
            subject: subject.to_string(),
            timestamp,
            axes: axes.to_vec(),
        })
    }

    pub fn register_subject(&self, subject: &str, display_name: &str) -> bool {
        self.submit(MonitorInput::Register {
            subject: subject.to_string(),
            display_name: display_name.to_string(),
        })
    }

    pub fn deregister_subject(&self, subject: &str) -> bool {
        self.submit(MonitorInput::Deregister {
            subject: subject.to_string(),
        })
    }

    pub fn reload(&self, config: MonitorConfig) -> bool {
        self.submit(MonitorInput::Reload(Box::new(config)))
    }

    /// Ask the loop to flush what it holds and exit.
    pub fn shutdown(&self) -> bool {
        self.submit(MonitorInput::Shutdown)
    }
}
