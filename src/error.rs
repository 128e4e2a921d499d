//! Error types for the BNO055 calibration monitor

use thiserror::Error;

/// Error type for sensor polling operations
#[derive(Error, Debug)]
pub enum MonitorError {
    /// Any failure reading from or writing to the sensor handle
    #[error("Sensor communication error: {0}")]
    CommunicationError(String),

    /// Closing the sensor handle failed while honouring a shutdown request
    #[error("Failed to close sensor during shutdown: {0}")]
    ShutdownError(String),

    /// The BNO055 only answers on 0x28 or 0x29
    #[error("Unsupported BNO055 I2C address: 0x{0:02X}")]
    InvalidAddress(u8),

    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Termination handler could not be installed
    #[error("Failed to install termination handler: {0}")]
    SignalHandler(#[from] ctrlc::Error),
}

impl MonitorError {
    /// Wrap a driver error raised by `operation`
    pub(crate) fn communication<E: std::fmt::Debug>(operation: &str, err: E) -> Self {
        MonitorError::CommunicationError(format!("{}: {:?}", operation, err))
    }
}

/// Result type for monitor operations
pub type Result<T> = std::result::Result<T, MonitorError>;
