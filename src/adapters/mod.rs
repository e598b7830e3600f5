//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter       | Implements  | Connects to             |
//! |---------------|-------------|-------------------------|
//! | `clock`       | Clock       | System real-time clock  |
//! | `config_file` | ConfigPort  | Local JSON config file  |
//! | `log_sink`    | EventSink   | Log output              |

pub mod clock;
pub mod config_file;
pub mod log_sink;
