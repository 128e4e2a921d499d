//! Sensor handle abstraction and the readings it produces
//!
//! The pollers in this crate never talk to the bus directly. They read through a
//! [`SensorHandle`], which owns the hardware connection; every reading is a fresh
//! snapshot and nothing is cached between polls.

use crate::error::{MonitorError, Result};
use std::fmt;

/// Calibration level reported once a subsystem is fully calibrated
pub const FULLY_CALIBRATED: u8 = 3;

/// Size of the BNO055 calibration profile (offsets and radii) in bytes
pub const CALIBRATION_PROFILE_LEN: usize = 22;

/// Per-subsystem calibration levels, each in `0..=3`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CalibrationStatus {
    /// Fusion system calibration level
    pub system: u8,
    /// Accelerometer calibration level
    pub accelerometer: u8,
    /// Gyroscope calibration level
    pub gyroscope: u8,
    /// Magnetometer calibration level
    pub magnetometer: u8,
}

impl CalibrationStatus {
    /// Build a status, rejecting levels above 3
    pub fn new(system: u8, accelerometer: u8, gyroscope: u8, magnetometer: u8) -> Result<Self> {
        let levels = [system, accelerometer, gyroscope, magnetometer];
        if let Some(level) = levels.iter().find(|&&l| l > FULLY_CALIBRATED) {
            return Err(MonitorError::InvalidParameter(format!(
                "Calibration level must be 0-3, got {}",
                level
            )));
        }

        Ok(Self {
            system,
            accelerometer,
            gyroscope,
            magnetometer,
        })
    }

    /// True only when all four levels read 3 in this same snapshot
    pub fn is_fully_calibrated(&self) -> bool {
        self.system == FULLY_CALIBRATED
            && self.accelerometer == FULLY_CALIBRATED
            && self.gyroscope == FULLY_CALIBRATED
            && self.magnetometer == FULLY_CALIBRATED
    }
}

impl fmt::Display for CalibrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "system={}, accelerometer={}, gyroscope={}, magnetometer={}",
            self.system, self.accelerometer, self.gyroscope, self.magnetometer
        )
    }
}

/// Opaque correction values produced by the sensor
///
/// Only meaningful when read alongside a fully calibrated [`CalibrationStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalibrationOffsets {
    bytes: [u8; CALIBRATION_PROFILE_LEN],
}

impl CalibrationOffsets {
    /// Wrap a raw calibration profile
    pub fn from_bytes(bytes: [u8; CALIBRATION_PROFILE_LEN]) -> Self {
        Self { bytes }
    }

    /// Copy a calibration profile out of a driver buffer
    pub fn from_slice(buf: &[u8]) -> Result<Self> {
        let bytes = buf.try_into().map_err(|_| {
            MonitorError::CommunicationError(format!(
                "Calibration profile: expected {} bytes, got {}",
                CALIBRATION_PROFILE_LEN,
                buf.len()
            ))
        })?;
        Ok(Self { bytes })
    }

    /// Raw profile bytes, in sensor register order
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl Default for CalibrationOffsets {
    fn default() -> Self {
        Self {
            bytes: [0; CALIBRATION_PROFILE_LEN],
        }
    }
}

impl fmt::Display for CalibrationOffsets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.bytes.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{:02X}", byte)?;
        }
        Ok(())
    }
}

/// Orientation angles in degrees
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OrientationVector {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl OrientationVector {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// All three components are finite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl fmt::Display for OrientationVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x={:5.3}, y={:5.3}, z={:5.3}", self.x, self.y, self.z)
    }
}

/// Firmware and sub-sensor identification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SensorRevision {
    pub software: u16,
    pub bootloader: u8,
    pub accelerometer: u8,
    pub gyroscope: u8,
    pub magnetometer: u8,
}

impl fmt::Display for SensorRevision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "software={}, bootloader={}, accelerometer={}, gyroscope={}, magnetometer={}",
            self.software, self.bootloader, self.accelerometer, self.gyroscope, self.magnetometer
        )
    }
}

/// Decoded system status, system error and self-test result
///
/// The driver only exposes these as a formatted description, so the summary is
/// carried as text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SystemStatus {
    summary: String,
}

impl SystemStatus {
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
        }
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }
}

impl fmt::Display for SystemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary)
    }
}

/// Sole path to the sensor's hardware state
///
/// Implementations are not expected to be safe for concurrent use; the pollers
/// only ever hold one `&mut` at a time.
pub trait SensorHandle {
    /// Select the external (`true`) or internal oscillator
    fn use_external_crystal(&mut self, enabled: bool) -> Result<()>;

    /// Read the current calibration offsets and status in one go
    fn read_calibration(&mut self) -> Result<(CalibrationOffsets, CalibrationStatus)>;

    /// Read the fused orientation
    fn read_orientation(&mut self) -> Result<OrientationVector>;

    /// Read system status and system error, without running the self-test
    fn read_system_status(&mut self) -> Result<SystemStatus>;

    /// Read firmware revision and sub-sensor chip IDs
    fn read_revision(&mut self) -> Result<SensorRevision>;

    /// Read the die temperature in °C
    fn read_temperature(&mut self) -> Result<i8>;

    /// Release the bus; reads afterwards fail with `CommunicationError`
    fn close(&mut self) -> Result<()>;
}
