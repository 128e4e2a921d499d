//! BNO055 reader - calibrate the sensor, then stream orientation until Ctrl+C
//!
//! Usage:
//!   bno055-reader [--address 0x28] [--bus 3] [--internal-crystal] [--interval-ms 100]

use bno055_monitor::config::{
    parse_address, DEFAULT_BUS_ADDRESS, DEFAULT_BUS_NUMBER, DEFAULT_POLL_INTERVAL,
};
use bno055_monitor::{
    Bno055Sensor, ConsoleReporter, MonitorConfig, MonitorError, Session, ShutdownController,
};
use clap::Parser;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "bno055-reader")]
#[command(about = "Calibrate a BNO055 IMU and stream its orientation", long_about = None)]
struct Args {
    /// I2C address of the sensor (0x28 or 0x29)
    #[arg(short, long, value_parser = parse_address, default_value_t = DEFAULT_BUS_ADDRESS)]
    address: u8,

    /// Linux I2C bus number (/dev/i2c-N)
    #[arg(short, long, default_value_t = DEFAULT_BUS_NUMBER)]
    bus: u8,

    /// Use the sensor's internal oscillator instead of the external crystal
    #[arg(long)]
    internal_crystal: bool,

    /// Interval between polls in milliseconds
    #[arg(short, long, default_value_t = DEFAULT_POLL_INTERVAL.as_millis() as u64)]
    interval_ms: u64,
}

impl Args {
    fn into_config(self) -> MonitorConfig {
        MonitorConfig {
            bus_address: self.address,
            bus_number: self.bus,
            external_crystal: !self.internal_crystal,
            poll_interval: Duration::from_millis(self.interval_ms),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = Args::parse().into_config();
    config.validate()?;

    println!("BNO055 Calibration Monitor");
    println!("==========================");
    println!("Started: {}", chrono::Local::now().to_rfc3339());
    println!("Bus: {} @ 0x{:02X}", config.bus_path(), config.bus_address);
    println!(
        "Clock: {} crystal",
        if config.external_crystal { "external" } else { "internal" }
    );
    println!("Poll interval: {} ms", config.poll_interval.as_millis());
    println!();

    let mut sensor = match Bno055Sensor::open(config.bus_address, config.bus_number) {
        Ok(s) => {
            println!("Sensor initialized successfully!");
            println!("Move the sensor through the calibration motions. Press Ctrl+C to exit\n");
            s
        }
        Err(MonitorError::CommunicationError(msg)) => {
            eprintln!("Error: {}", msg);
            eprintln!("Please check:");
            eprintln!("  1. {} exists and is readable by this user", config.bus_path());
            eprintln!("  2. The BNO055 is powered (3.3V) and wired to SDA/SCL");
            eprintln!("  3. COM3 matches the requested address (low = 0x28, high = 0x29)");
            return Err(Box::new(MonitorError::CommunicationError(msg)));
        }
        Err(e) => {
            eprintln!("Error initializing sensor: {}", e);
            return Err(Box::new(e));
        }
    };

    let shutdown = ShutdownController::new();
    shutdown.arm()?;

    let mut reporter = ConsoleReporter::new();
    let mut session = Session::new(config, shutdown)?;

    match session.run(&mut sensor, &mut reporter) {
        Ok(summary) => {
            drop(reporter);
            println!("\nSensor closed.");
            println!("Calibration polls: {}", summary.calibration_polls);
            println!("Orientation polls: {}", summary.orientation_polls);
            Ok(())
        }
        Err(e) => {
            drop(reporter);
            log::error!("Session failed: {}", e);
            eprintln!("\nError: {}", e);
            Err(Box::new(e))
        }
    }
}
