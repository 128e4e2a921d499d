//! Calibration phase: poll calibration status until every subsystem reads 3

use crate::error::Result;
use crate::poll::{PollLoop, PollOutcome, Sleeper, StreamControl, ThreadSleeper};
use crate::report::Reporter;
use crate::sensor::{CalibrationOffsets, CalibrationStatus, SensorHandle};
use crate::shutdown::ShutdownController;
use log::debug;
use std::time::Duration;

/// Offsets and status from the poll that first reported full calibration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calibration {
    pub offsets: CalibrationOffsets,
    pub status: CalibrationStatus,
}

/// Drives the sensor's calibration to completion, reporting progress each poll
pub struct CalibrationMonitor<Z: Sleeper = ThreadSleeper> {
    poller: PollLoop<Z>,
}

impl CalibrationMonitor<ThreadSleeper> {
    /// Create a monitor that sleeps the calling thread between polls
    ///
    /// # Returns
    /// * `Err(MonitorError::InvalidParameter)` - `interval` is zero
    pub fn new(shutdown: ShutdownController, interval: Duration) -> Result<Self> {
        Ok(Self {
            poller: PollLoop::new(shutdown, interval)?,
        })
    }

    /// Take one calibration reading; errors are passed through untouched
    pub fn poll_once<S: SensorHandle + ?Sized>(
        sensor: &mut S,
    ) -> Result<(CalibrationOffsets, CalibrationStatus)> {
        sensor.read_calibration()
    }

    /// True iff all four levels equal 3
    pub fn is_complete(status: &CalibrationStatus) -> bool {
        status.is_fully_calibrated()
    }
}

impl<Z: Sleeper> CalibrationMonitor<Z> {
    /// Create a monitor with a custom sleeper
    pub fn with_sleeper(shutdown: ShutdownController, interval: Duration, sleeper: Z) -> Result<Self> {
        Ok(Self {
            poller: PollLoop::with_sleeper(shutdown, interval, sleeper)?,
        })
    }

    /// Poll until fully calibrated or cancelled
    ///
    /// Each poll's status is reported as a progress line. On cancellation the
    /// sensor is closed and no calibration is returned.
    pub fn run<S, P>(&mut self, sensor: &mut S, reporter: &mut P) -> Result<PollOutcome<Calibration>>
    where
        S: SensorHandle + ?Sized,
        P: Reporter + ?Sized,
    {
        self.poller.run(
            sensor,
            |s| {
                let (offsets, status) = CalibrationMonitor::poll_once(s)?;
                Ok(Calibration { offsets, status })
            },
            |calibration: &Calibration| {
                debug!("Calibration status: {}", calibration.status);
                reporter.progress(&format!(
                    "*** Calibration status (0..3): {}",
                    calibration.status
                ));

                if CalibrationMonitor::is_complete(&calibration.status) {
                    StreamControl::Break
                } else {
                    StreamControl::Continue
                }
            },
        )
    }

    /// Borrow the sleeper
    pub fn sleeper(&self) -> &Z {
        self.poller.sleeper()
    }
}
