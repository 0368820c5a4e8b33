// src/graph/task.rs

//! Task definitions: a named action plus the tasks it triggers.

use std::fmt;
use std::sync::Arc;

use crate::exec::Action;

/// Stable index of a task inside a [`TaskGraph`](super::TaskGraph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(pub(crate) usize);

impl TaskId {
    /// Position of this task in its graph's arena.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A reusable unit of work.
///
/// The same task may be run by many activities at once (different payloads,
/// different depths) and may appear in several `triggers` lists. Once the
/// owning graph is built, a task is never mutated.
pub struct Task<P> {
    pub(crate) name: String,
    pub(crate) action: Arc<dyn Action<P>>,
    pub(crate) triggers: Vec<TaskId>,
}

impl<P> Task<P> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn action(&self) -> &Arc<dyn Action<P>> {
        &self.action
    }

    /// Tasks enqueued, in this order, after the action succeeds.
    pub fn triggers(&self) -> &[TaskId] {
        &self.triggers
    }
}

impl<P> fmt::Debug for Task<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name)
            .field("triggers", &self.triggers)
            .finish_non_exhaustive()
    }
}
