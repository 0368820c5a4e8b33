// src/graph/mod.rs

//! Task graph representation.
//!
//! - [`task`] holds the `Task` record and its `TaskId` handle.
//! - [`activity`] holds the per-execution `Activity` value that flows
//!   through the priority queue.
//!
//! Tasks live in an arena (`TaskGraph`) and reference each other by
//! `TaskId`, so a task can be shared by many trigger lists without any
//! ownership cycles. The graph is assembled with [`TaskGraphBuilder`] and is
//! read-only afterwards.

pub mod activity;
pub mod task;

pub use activity::Activity;
pub use task::{Task, TaskId};

use std::collections::HashMap;
use std::sync::Arc;

use petgraph::Direction;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;

use crate::errors::{Result, SchedulerError};
use crate::exec::Action;

/// Immutable arena of tasks, indexed by [`TaskId`].
#[derive(Debug)]
pub struct TaskGraph<P> {
    tasks: Vec<Task<P>>,
}

impl<P> TaskGraph<P> {
    pub fn builder() -> TaskGraphBuilder<P> {
        TaskGraphBuilder::new()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task<P>> {
        self.tasks.get(id.0)
    }

    /// Look up a task by name. If several tasks share a name, the first one
    /// added wins.
    pub fn find(&self, name: &str) -> Option<TaskId> {
        self.tasks.iter().position(|t| t.name == name).map(TaskId)
    }

    /// Name of a task, or `"<unknown>"` for an id from another graph.
    pub fn name_of(&self, id: TaskId) -> &str {
        self.get(id).map(|t| t.name()).unwrap_or("<unknown>")
    }

    /// Immediate triggers of a task (empty for unknown ids).
    pub fn triggers_of(&self, id: TaskId) -> &[TaskId] {
        self.get(id).map(|t| t.triggers()).unwrap_or(&[])
    }

    pub fn ids(&self) -> impl Iterator<Item = TaskId> + '_ {
        (0..self.tasks.len()).map(TaskId)
    }

    pub fn tasks(&self) -> impl Iterator<Item = (TaskId, &Task<P>)> {
        self.tasks.iter().enumerate().map(|(i, t)| (TaskId(i), t))
    }

    /// Number of action invocations a draining run seeded with `seeds` will
    /// perform: every trigger edge is unrolled, so a task reached along two
    /// paths counts twice.
    ///
    /// Returns `None` when a trigger cycle is reachable from the seeds, since
    /// such a run never finishes.
    pub fn unrolled_count(&self, seeds: &[TaskId]) -> Option<u64> {
        let mut full: DiGraph<(), ()> = DiGraph::with_capacity(self.tasks.len(), 0);
        for _ in &self.tasks {
            full.add_node(());
        }
        for (id, task) in self.tasks() {
            for child in task.triggers() {
                full.add_edge(NodeIndex::new(id.0), NodeIndex::new(child.0), ());
            }
        }

        // Restrict to what the seeds can reach; unreachable cycles are harmless.
        let mut reachable: HashMap<NodeIndex, NodeIndex> = HashMap::new();
        let mut sub: DiGraph<NodeIndex, ()> = DiGraph::new();
        for seed in seeds {
            if seed.0 >= self.tasks.len() {
                continue;
            }
            let mut dfs = Dfs::new(&full, NodeIndex::new(seed.0));
            while let Some(node) = dfs.next(&full) {
                reachable
                    .entry(node)
                    .or_insert_with(|| sub.add_node(node));
            }
        }
        for (&old, &new) in reachable.iter() {
            for child in full.neighbors_directed(old, Direction::Outgoing) {
                if let Some(&sub_child) = reachable.get(&child) {
                    sub.add_edge(new, sub_child, ());
                }
            }
        }

        let order = toposort(&sub, None).ok()?;

        let mut counts: HashMap<NodeIndex, u64> = HashMap::new();
        for node in order.into_iter().rev() {
            let below = sub
                .neighbors_directed(node, Direction::Outgoing)
                .map(|child| counts.get(&child).copied().unwrap_or(0))
                .fold(0u64, u64::saturating_add);
            counts.insert(node, below.saturating_add(1));
        }

        let total = seeds
            .iter()
            .filter_map(|seed| reachable.get(&NodeIndex::new(seed.0)))
            .map(|node| counts.get(node).copied().unwrap_or(0))
            .fold(0u64, u64::saturating_add);
        Some(total)
    }
}

/// Builder used to assemble a [`TaskGraph`] before any execution starts.
pub struct TaskGraphBuilder<P> {
    tasks: Vec<Task<P>>,
}

impl<P> Default for TaskGraphBuilder<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> TaskGraphBuilder<P> {
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Register a task with no triggers yet and return its id.
    pub fn add_task(&mut self, name: impl Into<String>, action: Arc<dyn Action<P>>) -> TaskId {
        let id = TaskId(self.tasks.len());
        self.tasks.push(Task {
            name: name.into(),
            action,
            triggers: Vec::new(),
        });
        id
    }

    /// Append `child` to the end of `parent`'s trigger list.
    pub fn add_trigger(&mut self, parent: TaskId, child: TaskId) -> Result<()> {
        if child.0 >= self.tasks.len() {
            return Err(SchedulerError::TaskNotFound(child.to_string()));
        }
        let task = self
            .tasks
            .get_mut(parent.0)
            .ok_or_else(|| SchedulerError::TaskNotFound(parent.to_string()))?;
        task.triggers.push(child);
        Ok(())
    }

    /// Append several triggers to `parent`, in order.
    pub fn with_triggers(&mut self, parent: TaskId, children: &[TaskId]) -> Result<()> {
        for &child in children {
            self.add_trigger(parent, child)?;
        }
        Ok(())
    }

    pub fn build(self) -> TaskGraph<P> {
        TaskGraph { tasks: self.tasks }
    }
}
