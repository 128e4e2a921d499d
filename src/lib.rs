//! BNO055 calibration monitor and orientation streamer
//!
//! This library drives a BNO055 9-axis IMU on a Linux I2C bus through its
//! calibration procedure, then streams fused orientation until the process is
//! asked to stop.
//!
//! Both phases share one poll loop: check for a shutdown request, read through the
//! [`SensorHandle`], report, sleep a fixed interval. A shutdown request closes the
//! sensor at the next iteration boundary; any bus error ends the run.
//!
//! # Quick Start
//!
//! ## Full session
//! ```no_run
//! use bno055_monitor::{
//!     Bno055Sensor, ConsoleReporter, MonitorConfig, Session, ShutdownController,
//! };
//!
//! let config = MonitorConfig::default();
//! let mut sensor = Bno055Sensor::open(config.bus_address, config.bus_number)?;
//!
//! let shutdown = ShutdownController::new();
//! shutdown.arm()?;
//!
//! let mut session = Session::new(config, shutdown)?;
//! let summary = session.run(&mut sensor, &mut ConsoleReporter::new())?;
//! println!("Streamed {} readings", summary.orientation_polls);
//! # Ok::<(), bno055_monitor::MonitorError>(())
//! ```
//!
//! ## Calibration only
//! ```no_run
//! use bno055_monitor::{
//!     Bno055Sensor, CalibrationMonitor, ConsoleReporter, PollOutcome, ShutdownController,
//! };
//! use std::time::Duration;
//!
//! let mut sensor = Bno055Sensor::open(0x28, 3)?;
//! let shutdown = ShutdownController::new();
//! shutdown.arm()?;
//!
//! let mut monitor = CalibrationMonitor::new(shutdown, Duration::from_millis(100))?;
//! if let PollOutcome::Completed { reading, .. } =
//!     monitor.run(&mut sensor, &mut ConsoleReporter::new())?
//! {
//!     println!("\nOffsets: {}", reading.offsets);
//! }
//! # Ok::<(), bno055_monitor::MonitorError>(())
//! ```

pub mod calibration;
pub mod config;
pub mod device;
pub mod error;
pub mod poll;
pub mod report;
pub mod sensor;
pub mod session;
pub mod shutdown;
pub mod telemetry;

#[cfg(test)]
mod testing;

// Re-export public API
pub use calibration::{Calibration, CalibrationMonitor};
pub use config::MonitorConfig;
pub use device::Bno055Sensor;
pub use error::{MonitorError, Result};
pub use poll::{PollLoop, PollOutcome, Sleeper, StreamControl, ThreadSleeper};
pub use report::{ConsoleReporter, Reporter};
pub use sensor::{
    CalibrationOffsets, CalibrationStatus, OrientationVector, SensorHandle, SensorRevision,
    SystemStatus,
};
pub use session::{Phase, Session, SessionSummary};
pub use shutdown::ShutdownController;
pub use telemetry::TelemetryStreamer;
