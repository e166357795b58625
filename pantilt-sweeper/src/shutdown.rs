//! Termination signals and timed waits
//!
//! SIGINT/SIGTERM are turned into a message on a bounded channel. Every
//! wait in the sweep goes through [`Hold`], so a signal cuts the current
//! wait short instead of being noticed after it.

use std::ops::ControlFlow;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender};
use std::thread;
use std::time::Duration;

use embedded_hal::delay::DelayNs;

/// A wait that can be interrupted by a shutdown request
pub trait Hold {
    /// Wait for `duration`
    ///
    /// Returns `Break` as soon as shutdown is requested, `Continue` if the
    /// full duration elapsed without one.
    fn hold(&mut self, duration: Duration) -> ControlFlow<()>;
}

/// Receiving side of the termination signal handler
pub struct ShutdownListener {
    rx: Receiver<()>,
}

impl ShutdownListener {
    /// Install the process-wide SIGINT/SIGTERM handler
    ///
    /// Can only be called once per process.
    pub fn install() -> Result<Self, ctrlc::Error> {
        let (tx, listener) = Self::channel();
        ctrlc::set_handler(move || {
            // Full means a request is already pending
            let _ = tx.try_send(());
        })?;
        Ok(listener)
    }

    /// Create an unattached listener and its sender
    fn channel() -> (SyncSender<()>, Self) {
        let (tx, rx) = mpsc::sync_channel(1);
        (tx, Self { rx })
    }
}

impl Hold for ShutdownListener {
    fn hold(&mut self, duration: Duration) -> ControlFlow<()> {
        match self.rx.recv_timeout(duration) {
            Ok(()) => ControlFlow::Break(()),
            Err(RecvTimeoutError::Timeout) => ControlFlow::Continue(()),
            Err(RecvTimeoutError::Disconnected) => {
                // Nobody can signal any more; still honor the wait
                thread::sleep(duration);
                ControlFlow::Continue(())
            }
        }
    }
}

/// Blocking delay backed by `thread::sleep`
#[derive(Debug, Default, Clone, Copy)]
pub struct StdDelay;

impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        thread::sleep(Duration::from_nanos(ns.into()));
    }

    fn delay_us(&mut self, us: u32) {
        thread::sleep(Duration::from_micros(us.into()));
    }

    fn delay_ms(&mut self, ms: u32) {
        thread::sleep(Duration::from_millis(ms.into()));
    }
}
