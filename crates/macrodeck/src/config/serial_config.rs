use crate::config::{default_baud_rate, default_read_timeout_ms};

use std::time::Duration;

use macrodeck_core::SerialSettings;
use serde::{Deserialize, Serialize};

/// Serial connection section of the configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerialConfig {
    /// Port name, e.g. `COM20` or `/dev/ttyACM0`.
    pub port: String,
    /// Baud rate the device firmware speaks.
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
    /// Blocking-read timeout of the reader loop, in milliseconds.
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,
}

impl SerialConfig {
    /// Convert into the core transport settings.
    pub fn settings(&self) -> SerialSettings {
        SerialSettings {
            port: self.port.clone(),
            baud_rate: self.baud_rate,
            read_timeout: Duration::from_millis(self.read_timeout_ms),
        }
    }
}
