//! Medicine-taking monitor.
//!
//! Infers from a pill box's 3-axis accelerometer whether the monitored
//! person has taken their medicine, classifies each detection as inside or
//! outside a configured daily window, and sends reminders when a window
//! is about to close without one.
//!
//! The pure logic lives in [`app`], [`sensors`], [`window`],
//! [`scheduler`] and [`batch`]; [`adapters`] and [`runtime`] connect it
//! to a clock, a config file, a log sink, and a background thread.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod batch;
pub mod config;
pub mod error;
pub mod runtime;
pub mod scheduler;
pub mod sensors;
pub mod window;
