//! BNO055 sensor handle over a Linux I2C bus
//!
//! Register access and unit conversion are delegated to the `bno055` driver crate;
//! this module only opens the bus, maps driver errors, and tracks whether the
//! handle has been closed.

use crate::error::{MonitorError, Result};
use crate::sensor::{
    CalibrationOffsets, CalibrationStatus, OrientationVector, SensorHandle, SensorRevision,
    SystemStatus,
};
use ::bno055::{BNO055OperationMode, Bno055};
use linux_embedded_hal::{Delay, I2cdev};
use log::{debug, info};

/// BNO055 address with COM3 pulled low (Adafruit breakout default)
pub const DEFAULT_ADDRESS: u8 = 0x28;

/// BNO055 address with COM3 pulled high
pub const ALTERNATE_ADDRESS: u8 = 0x29;

/// BNO055 in NDOF fusion mode
pub struct Bno055Sensor {
    imu: Option<Bno055<I2cdev>>,
    delay: Delay,
    bus_path: String,
}

impl Bno055Sensor {
    /// Open `/dev/i2c-<bus_number>` and bring the sensor up in NDOF mode
    ///
    /// # Arguments
    /// * `address` - I2C address of the sensor (0x28 or 0x29)
    /// * `bus_number` - Linux I2C bus number
    ///
    /// # Returns
    /// * `Ok(Bno055Sensor)` - Initialised sensor, fusion running
    /// * `Err(MonitorError)` - Unsupported address or bus failure
    pub fn open(address: u8, bus_number: u8) -> Result<Self> {
        if address != DEFAULT_ADDRESS && address != ALTERNATE_ADDRESS {
            return Err(MonitorError::InvalidAddress(address));
        }

        let bus_path = format!("/dev/i2c-{}", bus_number);
        let dev = I2cdev::new(&bus_path).map_err(|e| {
            MonitorError::CommunicationError(format!("Failed to open {}: {}", bus_path, e))
        })?;

        // The driver calls 0x29 its default and 0x28 the alternative
        let mut imu = if address == DEFAULT_ADDRESS {
            Bno055::new(dev).with_alternative_address()
        } else {
            Bno055::new(dev)
        };

        let mut delay = Delay;
        imu.init(&mut delay)
            .map_err(|e| MonitorError::communication("initialise BNO055", e))?;
        imu.set_mode(BNO055OperationMode::NDOF, &mut delay)
            .map_err(|e| MonitorError::communication("enter NDOF mode", e))?;

        info!("BNO055 ready at 0x{:02X} on {}", address, bus_path);

        Ok(Self {
            imu: Some(imu),
            delay,
            bus_path,
        })
    }

    fn parts(&mut self) -> Result<(&mut Bno055<I2cdev>, &mut Delay)> {
        match self.imu.as_mut() {
            Some(imu) => Ok((imu, &mut self.delay)),
            None => Err(MonitorError::CommunicationError(format!(
                "Sensor on {} is closed",
                self.bus_path
            ))),
        }
    }
}

impl SensorHandle for Bno055Sensor {
    fn use_external_crystal(&mut self, enabled: bool) -> Result<()> {
        let (imu, delay) = self.parts()?;
        imu.set_external_crystal(enabled, delay)
            .map_err(|e| MonitorError::communication("select oscillator", e))
    }

    fn read_calibration(&mut self) -> Result<(CalibrationOffsets, CalibrationStatus)> {
        let (imu, delay) = self.parts()?;
        let raw = imu
            .get_calibration_status()
            .map_err(|e| MonitorError::communication("read calibration status", e))?;
        let status = CalibrationStatus::new(raw.sys, raw.acc, raw.gyr, raw.mag)?;

        // Reading the profile drops the chip into CONFIG mode and back, which
        // would restart fusion; only do it once the offsets mean something.
        let offsets = if status.is_fully_calibrated() {
            let profile = imu
                .calibration_profile(delay)
                .map_err(|e| MonitorError::communication("read calibration profile", e))?;
            CalibrationOffsets::from_slice(profile.as_bytes())?
        } else {
            CalibrationOffsets::default()
        };

        Ok((offsets, status))
    }

    fn read_orientation(&mut self) -> Result<OrientationVector> {
        let (imu, _) = self.parts()?;
        let euler = imu
            .euler_angles()
            .map_err(|e| MonitorError::communication("read euler angles", e))?;
        Ok(OrientationVector::new(euler.a, euler.b, euler.c))
    }

    fn read_system_status(&mut self) -> Result<SystemStatus> {
        let (imu, delay) = self.parts()?;
        let status = imu
            .get_system_status(false, delay)
            .map_err(|e| MonitorError::communication("read system status", e))?;
        Ok(SystemStatus::new(format!("{:?}", status)))
    }

    fn read_revision(&mut self) -> Result<SensorRevision> {
        let (imu, _) = self.parts()?;
        let rev = imu
            .get_revision()
            .map_err(|e| MonitorError::communication("read revision", e))?;
        Ok(SensorRevision {
            software: rev.software,
            bootloader: rev.bootloader,
            accelerometer: rev.accelerometer,
            gyroscope: rev.gyroscope,
            magnetometer: rev.magnetometer,
        })
    }

    fn read_temperature(&mut self) -> Result<i8> {
        let (imu, _) = self.parts()?;
        imu.temperature()
            .map_err(|e| MonitorError::communication("read temperature", e))
    }

    fn close(&mut self) -> Result<()> {
        let Some(mut imu) = self.imu.take() else {
            debug!("Sensor on {} already closed", self.bus_path);
            return Ok(());
        };

        // Stop fusion before the bus is released; the device node closes on drop
        imu.set_mode(BNO055OperationMode::CONFIG_MODE, &mut self.delay)
            .map_err(|e| MonitorError::communication("enter CONFIG mode", e))?;

        info!("Closed sensor on {}", self.bus_path);
        Ok(())
    }
}
