// src/engine/mod.rs

//! Scheduling engine for fandag.
//!
//! This module ties together:
//! - the shared activity priority queue ([`queue`])
//! - the concurrency gate bounding simultaneous actions ([`gate`])
//! - the per-activity execution step ([`execute`])
//! - the worker loop ([`worker`])
//! - the driver that seeds a run and decides when it ends ([`scheduler`])
//! - the shutdown signal shared by all of the above ([`shutdown`])

use tokio::sync::mpsc;

/// Canonical task name type used in events.
pub type TaskName = String;

/// Diagnostics emitted while a run progresses.
///
/// Callers that want more than the `tracing` output can inject an
/// [`EventSink`] with [`Scheduler::with_events`].
#[derive(Debug, Clone, PartialEq)]
pub enum SchedulerEvent<P> {
    /// An activity was pushed onto the queue (seed or trigger).
    ActivityQueued {
        task: TaskName,
        depth: u32,
        payload: P,
    },
    /// A worker popped an activity and is about to run its task.
    ActivityStarted {
        task: TaskName,
        depth: u32,
        payload: P,
    },
    /// The task's action returned `result`; its triggers have been queued.
    ActivityCompleted {
        task: TaskName,
        depth: u32,
        result: P,
    },
    /// The task's action failed or panicked; nothing was queued for it.
    ActivityFailed {
        task: TaskName,
        depth: u32,
        payload: P,
        error: String,
    },
}

/// Sending side of the optional diagnostics channel.
pub type EventSink<P> = mpsc::UnboundedSender<SchedulerEvent<P>>;

pub mod execute;
pub mod gate;
pub mod queue;
pub mod scheduler;
pub mod shutdown;
pub mod worker;

pub use gate::{ConcurrencyGate, GatePermit};
pub use queue::PriorityQueue;
pub use scheduler::{RunReport, Scheduler, SchedulerOptions};
pub use shutdown::ShutdownHandle;
pub use worker::WorkerState;
pub use crate::types::{FailurePolicy, TerminationMode};
