// src/engine/gate.rs

use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::errors::{Result, SchedulerError};

/// Counting admission gate bounding how many actions run at once.
///
/// Backed by Tokio's semaphore, which hands out permits in FIFO order, so a
/// waiting worker is never starved by later arrivals. Slots are returned by
/// dropping the [`GatePermit`], which also happens when the holder errors or
/// unwinds.
#[derive(Debug, Clone)]
pub struct ConcurrencyGate {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

/// One slot of a [`ConcurrencyGate`], released on drop.
#[derive(Debug)]
pub struct GatePermit {
    _permit: OwnedSemaphorePermit,
}

impl ConcurrencyGate {
    /// Create a gate with `capacity` slots.
    ///
    /// `capacity` is clamped to at least 1; a zero-slot gate would never
    /// admit anything.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Slots currently free.
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Wait for a free slot.
    pub async fn acquire(&self) -> Result<GatePermit> {
        let permit = Arc::clone(&self.semaphore)
            .acquire_owned()
            .await
            .map_err(|_| SchedulerError::GateClosed)?;
        Ok(GatePermit { _permit: permit })
    }

    /// Stop admitting: pending and future `acquire` calls fail.
    pub fn close(&self) {
        self.semaphore.close();
    }
}
