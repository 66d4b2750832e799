use std::path::Path;

use core_types::{RenderMode, SerialConfig};
use monitor_protocol::MonitorError;
use serde::{Deserialize, Serialize};

use crate::constants::{poll, port, sender};

/// Runtime settings. Every field has a default, so a config file only needs
/// the keys it changes:
///
/// ```json
/// { "slots": ["/dev/ttyUSB0", "/dev/ttyACM0"], "baud_rate": 115200 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MonitorConfig {
    pub slots: Vec<String>,
    pub baud_rate: u32,
    pub read_timeout_ms: u64,
    pub port_scan_interval_ms: u64,
    pub receive_interval_ms: u64,
    pub receive_chunk: usize,
    pub history_capacity: usize,
    pub render_mode: RenderMode,
    pub auto_connect: bool,
    pub append_newline: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            slots: port::DEFAULT_SLOTS.iter().map(|s| s.to_string()).collect(),
            baud_rate: port::DEFAULT_BAUD_RATE,
            read_timeout_ms: port::READ_TIMEOUT_MS,
            port_scan_interval_ms: poll::PORT_SCAN_INTERVAL_MS,
            receive_interval_ms: poll::RECEIVE_INTERVAL_MS,
            receive_chunk: poll::RECEIVE_CHUNK,
            history_capacity: sender::HISTORY_CAPACITY,
            render_mode: RenderMode::default(),
            auto_connect: false,
            append_newline: false,
        }
    }
}

impl MonitorConfig {
    pub fn from_json_str(json: &str) -> Result<Self, MonitorError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| MonitorError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, MonitorError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| MonitorError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), MonitorError> {
        if self.slots.is_empty() {
            return Err(MonitorError::Config("at least one port slot is required".into()));
        }
        for (i, slot) in self.slots.iter().enumerate() {
            if slot.trim().is_empty() {
                return Err(MonitorError::Config(format!("slot {} has an empty name", i + 1)));
            }
            if self.slots.iter().skip(i + 1).any(|other| other == slot) {
                return Err(MonitorError::Config(format!("slot '{slot}' is listed twice")));
            }
        }
        if self.baud_rate == 0 {
            return Err(MonitorError::Config("baud_rate must be positive".into()));
        }
        if self.port_scan_interval_ms == 0 || self.receive_interval_ms == 0 {
            return Err(MonitorError::Config("poll intervals must be positive".into()));
        }
        if self.receive_chunk == 0 {
            return Err(MonitorError::Config("receive_chunk must be positive".into()));
        }
        Ok(())
    }

    pub fn serial_config(&self) -> SerialConfig {
        SerialConfig::new(self.baud_rate, self.read_timeout_ms)
    }
}
