//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises the monitor against
//! mock ports.  Time is injected explicitly; no test sleeps.

mod mock_ports;
mod monitor_tests;
