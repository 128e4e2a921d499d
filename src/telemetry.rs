//! Telemetry phase: stream orientation readings until cancelled

use crate::error::Result;
use crate::poll::{PollLoop, Sleeper, StreamControl, ThreadSleeper};
use crate::report::Reporter;
use crate::sensor::{OrientationVector, SensorHandle};
use crate::shutdown::ShutdownController;
use log::{debug, warn};
use std::time::Duration;

/// Continuously reports the sensor's orientation
///
/// There is no success condition: [`TelemetryStreamer::run`] returns only when a
/// shutdown request is honoured or a read fails.
pub struct TelemetryStreamer<Z: Sleeper = ThreadSleeper> {
    poller: PollLoop<Z>,
}

impl TelemetryStreamer<ThreadSleeper> {
    /// Create a streamer that sleeps the calling thread between polls
    pub fn new(shutdown: ShutdownController, interval: Duration) -> Result<Self> {
        Ok(Self {
            poller: PollLoop::new(shutdown, interval)?,
        })
    }

    /// Take one orientation reading; errors are passed through untouched
    pub fn poll_once<S: SensorHandle + ?Sized>(sensor: &mut S) -> Result<OrientationVector> {
        sensor.read_orientation()
    }
}

impl<Z: Sleeper> TelemetryStreamer<Z> {
    /// Create a streamer with a custom sleeper
    pub fn with_sleeper(shutdown: ShutdownController, interval: Duration, sleeper: Z) -> Result<Self> {
        Ok(Self {
            poller: PollLoop::with_sleeper(shutdown, interval, sleeper)?,
        })
    }

    /// Stream until cancelled
    ///
    /// # Returns
    /// * `Ok(u64)` - Number of readings reported before the sensor was closed
    /// * `Err(MonitorError)` - A read failed, or closing failed during shutdown
    pub fn run<S, P>(&mut self, sensor: &mut S, reporter: &mut P) -> Result<u64>
    where
        S: SensorHandle + ?Sized,
        P: Reporter + ?Sized,
    {
        let outcome = self.poller.run(
            sensor,
            |s| TelemetryStreamer::poll_once(s),
            |vector: &OrientationVector| {
                if !vector.is_finite() {
                    warn!("Non-finite orientation reading: {:?}", vector);
                }
                debug!("Orientation: {}", vector);
                reporter.progress(&format!("*** Euler angles: {}", vector));
                StreamControl::Continue
            },
        )?;

        Ok(outcome.polls())
    }

    pub fn sleeper(&self) -> &Z {
        self.poller.sleeper()
    }
}
