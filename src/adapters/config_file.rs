//! Local JSON config file adapter.
//!
//! Implements [`ConfigPort`] over a JSON file on disk.  A missing file is
//! not an error: the monitor falls back to built-in defaults, as on first
//! start.  A file that exists but cannot be parsed is reported as
//! [`ConfigError::Corrupted`] so startup fails loudly.

use std::io::ErrorKind;
use std::path::PathBuf;

use log::{debug, warn};

use crate::app::ports::ConfigPort;
use crate::config::MonitorConfig;
use crate::error::ConfigError;

pub struct JsonFileConfig {
    path: PathBuf,
}

impl JsonFileConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ConfigPort for JsonFileConfig {
    fn load(&self) -> Result<MonitorConfig, ConfigError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(t) => t,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(
                    "Local config {} does not exist, using defaults",
                    self.path.display()
                );
                return Ok(MonitorConfig::default());
            }
            Err(e) => return Err(ConfigError::IoError(e.to_string())),
        };
        let config = MonitorConfig::from_json(&text)?;
        debug!("Read local config from {}", self.path.display());
        Ok(config)
    }
}
