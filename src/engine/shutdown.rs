// src/engine/shutdown.rs

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

/// Cloneable handle used to stop a run.
///
/// The scheduler fires it itself when a draining run has no outstanding
/// work left (or when a fail-fast failure occurs); callers fire it to stop a
/// daemon-mode run, e.g. on Ctrl-C. Firing is idempotent.
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl Default for ShutdownHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownHandle {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Request that all workers stop after their current activity.
    pub fn shutdown(&self) {
        let changed = self.tx.send_if_modified(|stopped| {
            let was = *stopped;
            *stopped = true;
            !was
        });
        if changed {
            debug!("shutdown signalled");
        }
    }

    pub fn is_shutdown(&self) -> bool {
        *self.tx.borrow()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}
