//! Fixed bus and polling parameters

use crate::device::{ALTERNATE_ADDRESS, DEFAULT_ADDRESS};
use crate::error::{MonitorError, Result};
use std::time::Duration;

/// I2C address the sensor answers on (COM3 pin low)
pub const DEFAULT_BUS_ADDRESS: u8 = DEFAULT_ADDRESS;

/// Linux I2C bus number, i.e. `/dev/i2c-3`
pub const DEFAULT_BUS_NUMBER: u8 = 3;

/// Interval slept between consecutive polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Everything needed to open the sensor and drive both phases
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    pub bus_address: u8,
    pub bus_number: u8,
    /// Clock the sensor from the board's 32 kHz crystal
    pub external_crystal: bool,
    pub poll_interval: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            bus_address: DEFAULT_BUS_ADDRESS,
            bus_number: DEFAULT_BUS_NUMBER,
            external_crystal: true,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl MonitorConfig {
    /// Device node of the configured bus
    pub fn bus_path(&self) -> String {
        format!("/dev/i2c-{}", self.bus_number)
    }

    pub fn validate(&self) -> Result<()> {
        if self.bus_address != DEFAULT_ADDRESS && self.bus_address != ALTERNATE_ADDRESS {
            return Err(MonitorError::InvalidAddress(self.bus_address));
        }

        if self.poll_interval.is_zero() {
            return Err(MonitorError::InvalidParameter(
                "Poll interval must be non-zero".to_string(),
            ));
        }

        Ok(())
    }
}

/// Parse an I2C address given as `0x28` or `40`
pub fn parse_address(s: &str) -> std::result::Result<u8, String> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => s.parse::<u8>(),
    };
    parsed.map_err(|e| format!("invalid I2C address '{}': {}", s, e))
}
