//! Fixed-interval poll loop shared by the calibration and telemetry phases
//!
//! Each iteration runs in a fixed order:
//!
//! 1. check the shutdown flag; if set, close the sensor and stop
//! 2. take one reading through the caller's read operation
//! 3. hand the reading to the caller's visitor, which reports it and decides
//!    whether the phase is finished
//! 4. sleep for the poll interval
//!
//! Cancellation is cooperative: a request that lands mid-read or mid-sleep is
//! honoured at the start of the next iteration. Read errors end the loop at once,
//! without sleeping and without closing the sensor.

use crate::error::{MonitorError, Result};
use crate::sensor::SensorHandle;
use crate::shutdown::ShutdownController;
use log::{debug, info};
use std::time::Duration;

/// Control flow returned by the per-reading visitor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamControl {
    /// Keep polling
    Continue,
    /// Stop polling; the current reading is the phase result
    Break,
}

/// How a poll loop ended, when it ended without error
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome<T> {
    /// The visitor returned [`StreamControl::Break`] for `reading`
    Completed { reading: T, polls: u64 },
    /// A shutdown request was honoured and the sensor was closed
    Cancelled { polls: u64 },
}

impl<T> PollOutcome<T> {
    /// Number of successful reads taken before the loop ended
    pub fn polls(&self) -> u64 {
        match self {
            PollOutcome::Completed { polls, .. } | PollOutcome::Cancelled { polls } => *polls,
        }
    }
}

/// Suspension between polls
pub trait Sleeper {
    fn sleep(&mut self, duration: Duration);
}

impl<Z: Sleeper + ?Sized> Sleeper for &mut Z {
    fn sleep(&mut self, duration: Duration) {
        (**self).sleep(duration);
    }
}

/// Blocks the current thread
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Poll-loop driver bound to one shutdown flag and interval
pub struct PollLoop<Z: Sleeper = ThreadSleeper> {
    shutdown: ShutdownController,
    interval: Duration,
    sleeper: Z,
}

impl PollLoop<ThreadSleeper> {
    /// Create a loop that sleeps the calling thread between polls
    pub fn new(shutdown: ShutdownController, interval: Duration) -> Result<Self> {
        Self::with_sleeper(shutdown, interval, ThreadSleeper)
    }
}

impl<Z: Sleeper> PollLoop<Z> {
    /// Create a loop with a custom sleeper
    pub fn with_sleeper(shutdown: ShutdownController, interval: Duration, sleeper: Z) -> Result<Self> {
        if interval.is_zero() {
            return Err(MonitorError::InvalidParameter(
                "Poll interval must be non-zero".to_string(),
            ));
        }

        Ok(Self {
            shutdown,
            interval,
            sleeper,
        })
    }

    /// Interval slept between consecutive polls
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Borrow the sleeper
    pub fn sleeper(&self) -> &Z {
        &self.sleeper
    }

    /// Poll `sensor` until the visitor breaks, a shutdown is requested, or a read fails
    ///
    /// # Arguments
    /// * `sensor` - Handle every read goes through; closed on cancellation
    /// * `read` - Takes one reading
    /// * `visit` - Reports a reading and decides whether to stop
    ///
    /// # Returns
    /// * `Ok(PollOutcome)` - Completed with the final reading, or cancelled
    /// * `Err(MonitorError::ShutdownError)` - Closing the sensor failed during cancellation
    /// * `Err(e)` - The read error, unchanged
    pub fn run<S, T, R, V>(&mut self, sensor: &mut S, mut read: R, mut visit: V) -> Result<PollOutcome<T>>
    where
        S: SensorHandle + ?Sized,
        R: FnMut(&mut S) -> Result<T>,
        V: FnMut(&T) -> StreamControl,
    {
        let mut polls = 0u64;

        loop {
            if self.shutdown.requested() {
                info!("Shutdown requested after {} polls, closing sensor", polls);
                sensor
                    .close()
                    .map_err(|e| MonitorError::ShutdownError(e.to_string()))?;
                return Ok(PollOutcome::Cancelled { polls });
            }

            let reading = read(&mut *sensor)?;
            polls += 1;

            if visit(&reading) == StreamControl::Break {
                debug!("Poll loop completed after {} polls", polls);
                return Ok(PollOutcome::Completed { reading, polls });
            }

            self.sleeper.sleep(self.interval);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CountingSleeper, ScriptedSensor};

    fn poll_loop(shutdown: &ShutdownController) -> PollLoop<CountingSleeper> {
        PollLoop::with_sleeper(
            shutdown.clone(),
            Duration::from_millis(100),
            CountingSleeper::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_zero_interval() {
        let result = PollLoop::new(ShutdownController::new(), Duration::ZERO);
        assert!(matches!(result, Err(MonitorError::InvalidParameter(_))));
    }

    #[test]
    fn test_breaks_on_visitor_request() {
        let shutdown = ShutdownController::new();
        let mut sensor = ScriptedSensor::default();
        let mut poller = poll_loop(&shutdown);
        let mut counter = 0u32;

        let outcome = poller
            .run(
                &mut sensor,
                |_| {
                    counter += 1;
                    Ok(counter)
                },
                |&n: &u32| {
                    if n == 4 {
                        StreamControl::Break
                    } else {
                        StreamControl::Continue
                    }
                },
            )
            .unwrap();

        assert_eq!(outcome, PollOutcome::Completed { reading: 4, polls: 4 });
        assert_eq!(poller.sleeper().count(), 3);
        assert_eq!(poller.sleeper().total(), Duration::from_millis(300));
        assert_eq!(sensor.close_calls(), 0);
    }

    #[test]
    fn test_cancellation_checked_before_read() {
        let shutdown = ShutdownController::new();
        shutdown.request();
        let mut sensor = ScriptedSensor::default();
        let mut poller = poll_loop(&shutdown);
        let mut reads = 0;

        let outcome = poller
            .run(
                &mut sensor,
                |_| {
                    reads += 1;
                    Ok(())
                },
                |_| StreamControl::Continue,
            )
            .unwrap();

        assert_eq!(outcome, PollOutcome::Cancelled { polls: 0 });
        assert_eq!(reads, 0);
        assert_eq!(sensor.close_calls(), 1);
        assert_eq!(poller.sleeper().count(), 0);
    }

    #[test]
    fn test_close_failure_is_shutdown_error() {
        let shutdown = ShutdownController::new();
        shutdown.request();
        let mut sensor = ScriptedSensor::default().fail_close();
        let mut poller = poll_loop(&shutdown);

        let result = poller.run(&mut sensor, |_| Ok(()), |_| StreamControl::Continue);

        assert!(matches!(result, Err(MonitorError::ShutdownError(_))));
        assert_eq!(sensor.close_calls(), 1);
    }

    #[test]
    fn test_read_error_stops_without_sleep() {
        let shutdown = ShutdownController::new();
        let mut sensor = ScriptedSensor::default();
        let mut poller = poll_loop(&shutdown);
        let mut reads = 0;

        let result: Result<PollOutcome<()>> = poller.run(
            &mut sensor,
            |_| {
                reads += 1;
                if reads == 3 {
                    Err(MonitorError::CommunicationError("bus NACK".to_string()))
                } else {
                    Ok(())
                }
            },
            |_| StreamControl::Continue,
        );

        match result {
            Err(MonitorError::CommunicationError(msg)) => assert_eq!(msg, "bus NACK"),
            other => panic!("expected communication error, got {:?}", other),
        }
        assert_eq!(reads, 3);
        assert_eq!(poller.sleeper().count(), 2);
        assert_eq!(sensor.close_calls(), 0);
    }
}
