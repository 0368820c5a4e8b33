// src/engine/worker.rs

//! Worker loop: pop, execute, requeue.

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, trace, warn};

use crate::engine::gate::ConcurrencyGate;
use crate::engine::queue::PriorityQueue;
use crate::engine::shutdown::ShutdownHandle;
use crate::engine::{EventSink, SchedulerEvent};
use crate::errors::{Result, SchedulerError};
use crate::graph::{Activity, TaskGraph};
use crate::types::{FailurePolicy, TerminationMode};

/// Lifecycle of a single worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Looking for work; waits on an empty queue instead of exiting.
    Idle,
    /// Executing a popped activity.
    Running,
    /// Stopped after the shutdown signal.
    Done,
}

/// Everything the workers of one run share.
#[derive(Debug)]
pub(crate) struct Shared<P> {
    pub graph: Arc<TaskGraph<P>>,
    pub queue: Arc<PriorityQueue<P>>,
    pub gate: ConcurrencyGate,
    pub shutdown: ShutdownHandle,
    pub events: Option<EventSink<P>>,
    pub termination: TerminationMode,
    pub failure_policy: FailurePolicy,
    pub poll_interval: Duration,
}

impl<P> Shared<P> {
    pub fn emit(&self, event: SchedulerEvent<P>) {
        if let Some(tx) = &self.events {
            // A dropped receiver just means nobody is listening any more.
            let _ = tx.send(event);
        }
    }
}

/// Per-worker counters, summed into the run report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct WorkerStats {
    pub completed: usize,
    pub failed: usize,
    pub max_depth: Option<u32>,
}

impl WorkerStats {
    fn record_depth(&mut self, depth: u32) {
        self.max_depth = Some(self.max_depth.map_or(depth, |d| d.max(depth)));
    }
}

/// Run one worker until the shutdown signal fires.
///
/// With [`FailurePolicy::FailFast`], the first action failure fires the
/// shutdown signal and is returned as the worker's error.
pub(crate) async fn run_worker<P>(id: usize, shared: Arc<Shared<P>>) -> Result<WorkerStats>
where
    P: Clone + Debug + Send + Sync + 'static,
{
    let mut stop_rx = shared.shutdown.subscribe();
    let mut stats = WorkerStats::default();
    let mut state = WorkerState::Idle;
    debug!(worker = id, ?state, "worker started");

    loop {
        let stopped = *stop_rx.borrow_and_update();
        if stopped {
            break;
        }

        let Some(activity) = shared.queue.pop() else {
            // Another worker's in-flight task may still push work, so an
            // empty queue only means "wait", never "exit".
            tokio::select! {
                _ = shared.queue.notified() => {}
                changed = stop_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                _ = tokio::time::sleep(shared.poll_interval) => {}
            }
            continue;
        };

        state = WorkerState::Running;
        trace!(worker = id, ?state, depth = activity.priority, "worker picked activity");
        stats.record_depth(activity.priority);

        match run_activity(&shared, activity).await {
            Ok(()) => stats.completed += 1,
            Err(err) => {
                stats.failed += 1;
                if shared.failure_policy == FailurePolicy::FailFast {
                    error!(worker = id, error = %err, "fail-fast: stopping run");
                    shared.shutdown.shutdown();
                    shared.queue.task_done();
                    return Err(err);
                }
            }
        }

        if shared.queue.task_done() && shared.termination == TerminationMode::Drain {
            info!(worker = id, "no outstanding activities left; finishing run");
            shared.shutdown.shutdown();
        }

        state = WorkerState::Idle;
        trace!(worker = id, ?state, "worker back to idle");
    }

    state = WorkerState::Done;
    debug!(
        worker = id,
        ?state,
        completed = stats.completed,
        failed = stats.failed,
        "worker stopped"
    );
    Ok(stats)
}

/// Execute one popped activity and report it to the diagnostics sink.
///
/// Failures are logged here with the task name, depth and payload; the
/// caller only decides whether they stop the run.
async fn run_activity<P>(shared: &Shared<P>, activity: Activity<P>) -> Result<()>
where
    P: Clone + Debug + Send + Sync + 'static,
{
    let Activity {
        priority: depth,
        task: id,
        payload,
    } = activity;

    let Some(task) = shared.graph.get(id) else {
        warn!(task = %id, depth, "activity refers to unknown task; dropping it");
        return Err(SchedulerError::TaskNotFound(id.to_string()));
    };

    shared.emit(SchedulerEvent::ActivityStarted {
        task: task.name().to_string(),
        depth,
        payload: payload.clone(),
    });

    // Each queued event is sent before its push.
    let announce = |next: &Activity<P>| {
        shared.emit(SchedulerEvent::ActivityQueued {
            task: shared.graph.name_of(next.task).to_string(),
            depth: next.priority,
            payload: next.payload.clone(),
        });
    };

    match task
        .execute_with(payload.clone(), depth, &shared.queue, &shared.gate, announce)
        .await
    {
        Ok(result) => {
            debug!(task = %task.name(), depth, result = ?result, "task completed");
            shared.emit(SchedulerEvent::ActivityCompleted {
                task: task.name().to_string(),
                depth,
                result,
            });
            Ok(())
        }
        Err(err) => {
            warn!(
                task = %task.name(),
                depth,
                payload = ?payload,
                error = %err,
                "task failed; its triggers will not run"
            );
            shared.emit(SchedulerEvent::ActivityFailed {
                task: task.name().to_string(),
                depth,
                payload,
                error: err.to_string(),
            });
            Err(err)
        }
    }
}
