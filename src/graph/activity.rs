// src/graph/activity.rs

use crate::graph::TaskId;

/// One scheduled execution of a task.
///
/// `priority` is the depth of the activity: seeds start at 0 and every
/// triggered activity sits one level below its parent. Higher priorities are
/// served first, which gives the scheduler its depth-first bias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity<P> {
    pub priority: u32,
    pub task: TaskId,
    pub payload: P,
}

impl<P> Activity<P> {
    pub fn new(priority: u32, task: TaskId, payload: P) -> Self {
        Self {
            priority,
            task,
            payload,
        }
    }

    /// A depth-0 activity, as created by the driver.
    pub fn seed(task: TaskId, payload: P) -> Self {
        Self::new(0, task, payload)
    }
}
