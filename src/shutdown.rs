//! Process-wide shutdown request flag
//!
//! Termination requests (Ctrl+C, SIGTERM, SIGHUP) arrive asynchronously from the
//! operating system. [`ShutdownController`] turns them into a single flag that poll
//! loops check at the top of every iteration, without ever blocking on it.

use crate::error::Result;
use log::info;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared, cloneable view of the shutdown flag
///
/// Clones observe the same flag, so the copy handed to the signal handler and the
/// one consulted by the poll loops always agree.
#[derive(Debug, Clone, Default)]
pub struct ShutdownController {
    requested: Arc<AtomicBool>,
}

impl ShutdownController {
    /// Create an unarmed controller with no request pending
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the termination handler
    ///
    /// Call once, before any poll loop starts. The handler stays installed for the
    /// lifetime of the process; a second call fails because only one handler can
    /// be registered.
    pub fn arm(&self) -> Result<()> {
        let controller = self.clone();
        ctrlc::set_handler(move || {
            if controller.request() {
                println!("\nReceived termination request, stopping...");
            }
        })?;
        Ok(())
    }

    /// Non-blocking check for a pending termination request
    pub fn requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Raise a termination request
    ///
    /// Returns `true` only for the request that actually set the flag; repeated
    /// requests are coalesced into that one.
    pub fn request(&self) -> bool {
        let first = !self.requested.swap(true, Ordering::SeqCst);
        if first {
            info!("Shutdown requested");
        }
        first
    }
}
