// src/engine/scheduler.rs

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::engine::gate::ConcurrencyGate;
use crate::engine::queue::PriorityQueue;
use crate::engine::shutdown::ShutdownHandle;
use crate::engine::worker::{Shared, WorkerStats, run_worker};
use crate::engine::{EventSink, SchedulerEvent};
use crate::errors::{Result, SchedulerError};
use crate::graph::{Activity, TaskGraph, TaskId};
use crate::types::{FailurePolicy, TerminationMode};

/// Knobs for a single run.
#[derive(Debug, Clone)]
pub struct SchedulerOptions {
    /// Number of workers draining the queue.
    pub workers: usize,
    /// Gate capacity; `None` means "same as `workers`".
    pub concurrency: Option<usize>,
    pub termination: TerminationMode,
    pub failure_policy: FailurePolicy,
    /// Upper bound on how long an idle worker waits before re-checking the
    /// queue when no push wakes it.
    pub poll_interval: Duration,
}

impl Default for SchedulerOptions {
    fn default() -> Self {
        Self {
            workers: 4,
            concurrency: None,
            termination: TerminationMode::default(),
            failure_policy: FailurePolicy::default(),
            poll_interval: Duration::from_millis(50),
        }
    }
}

impl SchedulerOptions {
    /// Effective gate capacity, never below 1.
    pub fn effective_concurrency(&self) -> usize {
        self.concurrency.unwrap_or(self.workers).max(1)
    }
}

/// Summary of a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Activities whose action succeeded.
    pub completed: usize,
    /// Activities whose action failed (isolated failures).
    pub failed: usize,
    /// Deepest priority any worker popped.
    pub max_depth: Option<u32>,
    /// Activities still queued when the run stopped (daemon shutdown).
    pub abandoned: usize,
}

impl RunReport {
    /// Total number of action invocations.
    pub fn invocations(&self) -> usize {
        self.completed + self.failed
    }

    fn absorb(&mut self, stats: WorkerStats) {
        self.completed += stats.completed;
        self.failed += stats.failed;
        self.max_depth = match (self.max_depth, stats.max_depth) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
    }
}

/// Driver: seeds the queue, starts the worker pool, waits for the run to end.
///
/// ```ignore
/// let mut graph = TaskGraph::builder();
/// let root = graph.add_task("root", from_fn(|x: i64| async move { Ok(x * 2) }));
/// let scheduler = Scheduler::new(Arc::new(graph.build()), SchedulerOptions::default());
/// scheduler.seed(root, 5)?;
/// let report = scheduler.run().await?;
/// ```
pub struct Scheduler<P> {
    graph: Arc<TaskGraph<P>>,
    options: SchedulerOptions,
    queue: Arc<PriorityQueue<P>>,
    shutdown: ShutdownHandle,
    events: Option<EventSink<P>>,
}

impl<P> Debug for Scheduler<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("tasks", &self.graph.len())
            .field("options", &self.options)
            .field("queued", &self.queue.len())
            .finish_non_exhaustive()
    }
}

impl<P> Scheduler<P>
where
    P: Clone + Debug + Send + Sync + 'static,
{
    pub fn new(graph: Arc<TaskGraph<P>>, options: SchedulerOptions) -> Self {
        Self {
            graph,
            options,
            queue: Arc::new(PriorityQueue::new()),
            shutdown: ShutdownHandle::new(),
            events: None,
        }
    }

    /// Forward [`SchedulerEvent`]s to `sink` for the rest of this run.
    pub fn with_events(mut self, sink: EventSink<P>) -> Self {
        self.events = Some(sink);
        self
    }

    pub fn options(&self) -> &SchedulerOptions {
        &self.options
    }

    pub fn graph(&self) -> &Arc<TaskGraph<P>> {
        &self.graph
    }

    /// The shared queue (for diagnostics).
    pub fn queue(&self) -> &Arc<PriorityQueue<P>> {
        &self.queue
    }

    /// Handle that stops the run when fired. Needed to end a daemon-mode run.
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Queue a depth-0 activity running `task` on `payload`.
    pub fn seed(&self, task: TaskId, payload: P) -> Result<()> {
        let name = self
            .graph
            .get(task)
            .map(|t| t.name().to_string())
            .ok_or_else(|| SchedulerError::TaskNotFound(task.to_string()))?;

        info!(task = %name, payload = ?payload, "seeding activity");
        if let Some(tx) = &self.events {
            let _ = tx.send(SchedulerEvent::ActivityQueued {
                task: name,
                depth: 0,
                payload: payload.clone(),
            });
        }
        self.queue.push(Activity::seed(task, payload));
        Ok(())
    }

    /// Run the worker pool until the termination condition holds.
    ///
    /// - `Drain`: returns once every seeded and triggered activity has been
    ///   handled.
    /// - `Daemon`: returns once the shutdown handle fires; anything still
    ///   queued is discarded and counted in [`RunReport::abandoned`].
    ///
    /// Under [`FailurePolicy::FailFast`] the first action failure stops all
    /// workers and is returned as the error.
    pub async fn run(self) -> Result<RunReport> {
        let workers = self.options.workers.max(1);
        let gate = ConcurrencyGate::new(self.options.effective_concurrency());

        info!(
            workers,
            concurrency = gate.capacity(),
            termination = ?self.options.termination,
            failure_policy = ?self.options.failure_policy,
            seeded = self.queue.len(),
            "starting run"
        );

        if self.options.termination == TerminationMode::Drain && self.queue.outstanding() == 0 {
            info!("nothing seeded; run finished immediately");
            return Ok(RunReport::default());
        }

        let shared = Arc::new(Shared {
            graph: Arc::clone(&self.graph),
            queue: Arc::clone(&self.queue),
            gate,
            shutdown: self.shutdown.clone(),
            events: self.events.clone(),
            termination: self.options.termination,
            failure_policy: self.options.failure_policy,
            poll_interval: self.options.poll_interval,
        });

        let mut pool = JoinSet::new();
        for id in 0..workers {
            pool.spawn(run_worker(id, Arc::clone(&shared)));
        }

        let mut report = RunReport::default();
        let mut first_error: Option<SchedulerError> = None;

        while let Some(joined) = pool.join_next().await {
            match joined {
                Ok(Ok(stats)) => report.absorb(stats),
                Ok(Err(err)) => {
                    first_error.get_or_insert(err);
                }
                Err(join_err) => {
                    error!(error = %join_err, "worker task ended abnormally");
                    shared.shutdown.shutdown();
                    first_error.get_or_insert(SchedulerError::Other(anyhow!(
                        "worker task ended abnormally: {join_err}"
                    )));
                }
            }
        }

        report.abandoned = shared.queue.clear();
        if report.abandoned > 0 {
            warn!(abandoned = report.abandoned, "run stopped with activities still queued");
        }

        if let Some(err) = first_error {
            return Err(err);
        }

        debug!(?report, "run report");
        info!(
            completed = report.completed,
            failed = report.failed,
            max_depth = ?report.max_depth,
            "run finished"
        );
        Ok(report)
    }
}
