//! Human-readable output sink
//!
//! Reporting is observational only: nothing written here feeds back into the
//! sensor, and write failures are ignored.

use std::io::{self, Write};

/// Write-only destination for progress and result lines
pub trait Reporter {
    /// Replace the previous progress line for the current phase
    fn progress(&mut self, line: &str);

    /// Emit a permanent line
    fn line(&mut self, line: &str);
}

/// Reporter that writes to stdout, overwriting progress in place with `\r`
#[derive(Debug, Default)]
pub struct ConsoleReporter {
    // A progress line is on screen without its newline
    pending_progress: bool,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self::default()
    }

    fn finish_progress(&mut self, out: &mut impl Write) {
        if self.pending_progress {
            let _ = writeln!(out);
            self.pending_progress = false;
        }
    }
}

impl Reporter for ConsoleReporter {
    fn progress(&mut self, line: &str) {
        let mut out = io::stdout().lock();
        // Clear to end of line so a shorter line fully replaces a longer one
        let _ = write!(out, "\r{}\x1B[K", line);
        let _ = out.flush();
        self.pending_progress = true;
    }

    fn line(&mut self, line: &str) {
        let mut out = io::stdout().lock();
        self.finish_progress(&mut out);
        let _ = writeln!(out, "{}", line);
        let _ = out.flush();
    }
}

impl Drop for ConsoleReporter {
    fn drop(&mut self) {
        let mut out = io::stdout().lock();
        self.finish_progress(&mut out);
        let _ = out.flush();
    }
}
