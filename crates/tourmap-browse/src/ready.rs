//! Readiness gate for the map surface.
//!
//! Marker and camera work must not run before the surface has finished its
//! own initialization. [`ready_gate`] hands the surface a [`ReadyHandle`]
//! to flip once, and everyone else a cloneable [`ReadyGate`] to await. A
//! gate observed ready stays ready; waits after the flip resolve
//! immediately.

use std::time::Duration;

use thiserror::Error;
use tokio::sync::watch;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MapReadyError {
    #[error("map surface not ready after {waited_ms} ms")]
    Timeout { waited_ms: u64 },
}

/// Producer side. Dropping it without calling [`ReadyHandle::mark_ready`]
/// leaves the gate permanently unready; waiters then time out.
pub struct ReadyHandle {
    tx: watch::Sender<bool>,
}

impl ReadyHandle {
    pub fn mark_ready(&self) {
        // Receivers may all be gone; that is fine, nobody is waiting.
        let _ = self.tx.send(true);
    }
}

/// Consumer side.
#[derive(Clone)]
pub struct ReadyGate {
    rx: watch::Receiver<bool>,
}

impl ReadyGate {
    /// Waits until the surface is ready, up to `timeout`.
    ///
    /// # Errors
    ///
    /// [`MapReadyError::Timeout`] when the gate was not flipped in time,
    /// including the case where the [`ReadyHandle`] was dropped unflipped.
    pub async fn wait(&self, timeout: Duration) -> Result<(), MapReadyError> {
        let mut rx = self.rx.clone();
        let waited = tokio::time::timeout(timeout, rx.wait_for(|ready| *ready)).await;
        match waited {
            Ok(Ok(_)) => Ok(()),
            // wait_for errs only when the sender is dropped while still
            // unready, which is indistinguishable from never becoming ready.
            Ok(Err(_)) | Err(_) => Err(MapReadyError::Timeout {
                waited_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            }),
        }
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        *self.rx.borrow()
    }
}

#[must_use]
pub fn ready_gate() -> (ReadyHandle, ReadyGate) {
    let (tx, rx) = watch::channel(false);
    (ReadyHandle { tx }, ReadyGate { rx })
}
