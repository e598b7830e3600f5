//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the monitor service and the contract around it:
//! inbound commands, outbound events, and the **port traits** that keep
//! the core testable without a real sensor, clock or network.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
