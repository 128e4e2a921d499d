//! Hardware-free doubles for unit tests

use crate::error::{MonitorError, Result};
use crate::poll::Sleeper;
use crate::report::Reporter;
use crate::sensor::{
    CalibrationOffsets, CalibrationStatus, OrientationVector, SensorHandle, SensorRevision,
    SystemStatus, CALIBRATION_PROFILE_LEN,
};
use crate::shutdown::ShutdownController;
use std::collections::VecDeque;
use std::time::Duration;

/// Sensor that replays scripted readings and counts every call
#[derive(Default)]
pub struct ScriptedSensor {
    calibrations: VecDeque<Result<(CalibrationOffsets, CalibrationStatus)>>,
    orientations: VecDeque<Result<OrientationVector>>,
    calibration_reads: usize,
    orientation_reads: usize,
    close_calls: usize,
    crystal: Option<bool>,
    fail_close: bool,
    cancel_after_orientations: Option<(usize, ShutdownController)>,
    cancel_after_calibrations: Option<(usize, ShutdownController)>,
}

/// Offsets tagged with `tag` in the first byte
pub fn offsets(tag: u8) -> CalibrationOffsets {
    let mut bytes = [0u8; CALIBRATION_PROFILE_LEN];
    bytes[0] = tag;
    CalibrationOffsets::from_bytes(bytes)
}

pub fn status(s: u8, a: u8, g: u8, m: u8) -> CalibrationStatus {
    CalibrationStatus::new(s, a, g, m).unwrap()
}

impl ScriptedSensor {
    /// Queue calibration statuses; the i-th read gets offsets tagged `i`
    pub fn with_statuses(mut self, statuses: &[(u8, u8, u8, u8)]) -> Self {
        for (i, &(s, a, g, m)) in statuses.iter().enumerate() {
            self.calibrations.push_back(Ok((offsets(i as u8), status(s, a, g, m))));
        }
        self
    }

    pub fn with_calibration_error(mut self, message: &str) -> Self {
        self.calibrations
            .push_back(Err(MonitorError::CommunicationError(message.to_string())));
        self
    }

    /// Queue `count` orientation readings
    pub fn with_orientations(mut self, count: usize) -> Self {
        for i in 0..count {
            let angle = i as f32;
            self.orientations
                .push_back(Ok(OrientationVector::new(angle, angle + 0.5, angle + 90.0)));
        }
        self
    }

    pub fn with_orientation_error(mut self, message: &str) -> Self {
        self.orientations
            .push_back(Err(MonitorError::CommunicationError(message.to_string())));
        self
    }

    pub fn fail_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    /// Raise a shutdown request right after the n-th orientation read
    pub fn cancel_after_orientations(mut self, n: usize, shutdown: &ShutdownController) -> Self {
        self.cancel_after_orientations = Some((n, shutdown.clone()));
        self
    }

    /// Raise a shutdown request right after the n-th calibration read
    pub fn cancel_after_calibrations(mut self, n: usize, shutdown: &ShutdownController) -> Self {
        self.cancel_after_calibrations = Some((n, shutdown.clone()));
        self
    }

    pub fn calibration_reads(&self) -> usize {
        self.calibration_reads
    }

    pub fn orientation_reads(&self) -> usize {
        self.orientation_reads
    }

    pub fn close_calls(&self) -> usize {
        self.close_calls
    }

    pub fn crystal(&self) -> Option<bool> {
        self.crystal
    }
}

impl SensorHandle for ScriptedSensor {
    fn use_external_crystal(&mut self, enabled: bool) -> Result<()> {
        self.crystal = Some(enabled);
        Ok(())
    }

    fn read_calibration(&mut self) -> Result<(CalibrationOffsets, CalibrationStatus)> {
        self.calibration_reads += 1;
        if let Some((n, shutdown)) = &self.cancel_after_calibrations {
            if self.calibration_reads == *n {
                shutdown.request();
            }
        }
        self.calibrations.pop_front().unwrap_or_else(|| {
            Err(MonitorError::CommunicationError(
                "calibration script exhausted".to_string(),
            ))
        })
    }

    fn read_orientation(&mut self) -> Result<OrientationVector> {
        self.orientation_reads += 1;
        if let Some((n, shutdown)) = &self.cancel_after_orientations {
            if self.orientation_reads == *n {
                shutdown.request();
            }
        }
        self.orientations.pop_front().unwrap_or_else(|| {
            Err(MonitorError::CommunicationError(
                "orientation script exhausted".to_string(),
            ))
        })
    }

    fn read_system_status(&mut self) -> Result<SystemStatus> {
        Ok(SystemStatus::new("system=FusionRunning, system_error=None, self_test=None"))
    }

    fn read_revision(&mut self) -> Result<SensorRevision> {
        Ok(SensorRevision {
            software: 785,
            bootloader: 21,
            accelerometer: 251,
            gyroscope: 15,
            magnetometer: 50,
        })
    }

    fn read_temperature(&mut self) -> Result<i8> {
        Ok(27)
    }

    fn close(&mut self) -> Result<()> {
        self.close_calls += 1;
        if self.fail_close {
            return Err(MonitorError::CommunicationError(
                "bus busy during close".to_string(),
            ));
        }
        Ok(())
    }
}

/// Records sleeps instead of performing them
#[derive(Debug, Default)]
pub struct CountingSleeper {
    sleeps: Vec<Duration>,
}

impl CountingSleeper {
    pub fn count(&self) -> usize {
        self.sleeps.len()
    }

    pub fn total(&self) -> Duration {
        self.sleeps.iter().sum()
    }
}

impl Sleeper for CountingSleeper {
    fn sleep(&mut self, duration: Duration) {
        self.sleeps.push(duration);
    }
}

/// Captures everything written to the reporting sink
#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub progress: Vec<String>,
    pub lines: Vec<String>,
}

impl Reporter for RecordingReporter {
    fn progress(&mut self, line: &str) {
        self.progress.push(line.to_string());
    }

    fn line(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }
}
