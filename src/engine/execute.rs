// src/engine/execute.rs

//! Running a single activity's task.

use std::fmt::Debug;
use std::sync::Arc;

use anyhow::anyhow;
use tracing::{debug, info};

use crate::engine::gate::ConcurrencyGate;
use crate::engine::queue::PriorityQueue;
use crate::errors::{Result, SchedulerError};
use crate::graph::{Activity, Task};

impl<P> Task<P>
where
    P: Clone + Debug + Send + 'static,
{
    /// Run this task's action on `input` and enqueue its triggers.
    ///
    /// `depth` is the priority of the activity being run. The action runs
    /// while holding one slot of `gate`; the slot is released however the
    /// action ends. On success every task in `triggers`, in list order, is
    /// pushed at `depth + 1` with the action's result as payload, and the
    /// result is returned. On failure nothing is pushed.
    ///
    /// The action runs on its own Tokio task so that a panic inside it
    /// surfaces as [`SchedulerError::ActionPanicked`] instead of taking the
    /// calling worker down.
    pub async fn execute(
        &self,
        input: P,
        depth: u32,
        queue: &PriorityQueue<P>,
        gate: &ConcurrencyGate,
    ) -> Result<P> {
        self.execute_with(input, depth, queue, gate, |_| {}).await
    }

    /// Like [`execute`](Self::execute), but calls `on_queue` with each
    /// triggered activity just before it becomes visible to other workers.
    pub async fn execute_with<F>(
        &self,
        input: P,
        depth: u32,
        queue: &PriorityQueue<P>,
        gate: &ConcurrencyGate,
        mut on_queue: F,
    ) -> Result<P>
    where
        F: FnMut(&Activity<P>),
    {
        info!(task = %self.name, depth, payload = ?input, "running task");

        let joined = {
            let _permit = gate.acquire().await?;
            let action = Arc::clone(&self.action);
            tokio::spawn(async move { action.call(input).await }).await
        };

        let output = match joined {
            Ok(Ok(output)) => output,
            Ok(Err(source)) => {
                return Err(SchedulerError::ActionFailed {
                    task: self.name.clone(),
                    depth,
                    source,
                });
            }
            Err(join_err) if join_err.is_panic() => {
                return Err(SchedulerError::ActionPanicked {
                    task: self.name.clone(),
                    depth,
                });
            }
            Err(join_err) => {
                return Err(SchedulerError::Other(anyhow!(
                    "action of task '{}' was aborted: {join_err}",
                    self.name
                )));
            }
        };

        let child_depth = depth.saturating_add(1);
        for &child in &self.triggers {
            let next = Activity::new(child_depth, child, output.clone());
            debug!(
                from = %self.name,
                child = %child,
                depth = next.priority,
                payload = ?next.payload,
                "queueing triggered activity"
            );
            on_queue(&next);
            queue.push(next);
        }

        Ok(output)
    }
}
