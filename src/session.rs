//! One run of the program: calibrate, then stream, then stop
//!
//! ```text
//! Starting ──► Calibrating ──► Streaming ──► Stopped
//!                   │                          ▲
//!                   └── cancelled / error ─────┘
//! ```
//!
//! `Stopped` is terminal: a session cannot be restarted.

use crate::calibration::{Calibration, CalibrationMonitor};
use crate::config::MonitorConfig;
use crate::error::{MonitorError, Result};
use crate::poll::{PollOutcome, Sleeper, ThreadSleeper};
use crate::report::Reporter;
use crate::sensor::SensorHandle;
use crate::shutdown::ShutdownController;
use crate::telemetry::TelemetryStreamer;
use log::info;
use std::time::Instant;

/// Lifecycle phase of a [`Session`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Starting,
    Calibrating,
    Streaming,
    Stopped,
}

/// What a session achieved before it stopped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// `None` when calibration was abandoned on a shutdown request
    pub calibration: Option<Calibration>,
    pub calibration_polls: u64,
    pub orientation_polls: u64,
}

/// Sequences the calibration and telemetry phases over one sensor
pub struct Session<Z: Sleeper = ThreadSleeper> {
    config: MonitorConfig,
    shutdown: ShutdownController,
    sleeper: Z,
    phase: Phase,
}

impl Session<ThreadSleeper> {
    /// Create a session in `Starting` that sleeps the calling thread between polls
    pub fn new(config: MonitorConfig, shutdown: ShutdownController) -> Result<Self> {
        Self::with_sleeper(config, shutdown, ThreadSleeper)
    }
}

impl<Z: Sleeper> Session<Z> {
    /// Create a session with a custom sleeper
    ///
    /// # Returns
    /// * `Err(MonitorError::InvalidParameter)` / `Err(MonitorError::InvalidAddress)` - `config` fails validation
    pub fn with_sleeper(config: MonitorConfig, shutdown: ShutdownController, sleeper: Z) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            config,
            shutdown,
            sleeper,
            phase: Phase::Starting,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn sleeper(&self) -> &Z {
        &self.sleeper
    }

    /// Run both phases to completion
    ///
    /// Returns once a shutdown request has been honoured (the sensor is closed by
    /// then) or with the first error. Either way the session ends `Stopped`.
    pub fn run<S, P>(&mut self, sensor: &mut S, reporter: &mut P) -> Result<SessionSummary>
    where
        S: SensorHandle + ?Sized,
        P: Reporter + ?Sized,
    {
        if self.phase != Phase::Starting {
            return Err(MonitorError::InvalidParameter(format!(
                "Session cannot be started from {:?}",
                self.phase
            )));
        }

        let result = self.drive(sensor, reporter);
        self.enter(Phase::Stopped);
        result
    }

    fn enter(&mut self, phase: Phase) {
        info!("{:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }

    fn drive<S, P>(&mut self, sensor: &mut S, reporter: &mut P) -> Result<SessionSummary>
    where
        S: SensorHandle + ?Sized,
        P: Reporter + ?Sized,
    {
        let mut summary = SessionSummary::default();

        sensor.use_external_crystal(self.config.external_crystal)?;

        self.enter(Phase::Calibrating);
        let started = Instant::now();
        let outcome = CalibrationMonitor::with_sleeper(
            self.shutdown.clone(),
            self.config.poll_interval,
            &mut self.sleeper,
        )?
        .run(sensor, reporter)?;

        let calibration = match outcome {
            PollOutcome::Completed { reading, polls } => {
                summary.calibration_polls = polls;
                reading
            }
            PollOutcome::Cancelled { polls } => {
                summary.calibration_polls = polls;
                reporter.line("*** Calibration abandoned");
                return Ok(summary);
            }
        };

        info!(
            "Calibrated after {} polls in {:.1}s",
            summary.calibration_polls,
            started.elapsed().as_secs_f64()
        );
        reporter.line(&format!("*** Done! Calibration offsets: {}", calibration.offsets));
        summary.calibration = Some(calibration);

        let system_status = sensor.read_system_status()?;
        reporter.line(&format!("*** Status: {}", system_status));

        let revision = sensor.read_revision()?;
        reporter.line(&format!("*** Revision: {}", revision));

        let temperature = sensor.read_temperature()?;
        reporter.line(&format!("*** Temperature: t={}", temperature));

        self.enter(Phase::Streaming);
        summary.orientation_polls = TelemetryStreamer::with_sleeper(
            self.shutdown.clone(),
            self.config.poll_interval,
            &mut self.sleeper,
        )?
        .run(sensor, reporter)?;

        Ok(summary)
    }
}
