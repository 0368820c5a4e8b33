// src/config/build.rs

//! Turning a validated [`ConfigFile`] into a task graph plus seeds.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::model::ConfigFile;
use crate::errors::{Result, SchedulerError};
use crate::exec::BuiltinAction;
use crate::graph::{TaskGraph, TaskId};

/// A task graph built from config, together with its seed activities.
#[derive(Debug)]
pub struct ConfiguredGraph {
    pub graph: TaskGraph<i64>,
    pub seeds: Vec<(TaskId, i64)>,
}

/// Build the graph described by `cfg`.
///
/// Tasks are added in config (name) order, then triggers are wired, so
/// forward references between tasks are fine.
pub fn build_graph(cfg: &ConfigFile) -> Result<ConfiguredGraph> {
    let mut builder = TaskGraph::builder();
    let mut ids: HashMap<&str, TaskId> = HashMap::new();

    for (name, task) in cfg.task.iter() {
        let action = BuiltinAction::from_config(name, task)?;
        let id = builder.add_task(name.clone(), Arc::new(action));
        ids.insert(name.as_str(), id);
    }

    let lookup = |name: &str| -> Result<TaskId> {
        ids.get(name)
            .copied()
            .ok_or_else(|| SchedulerError::TaskNotFound(name.to_string()))
    };

    for (name, task) in cfg.task.iter() {
        let parent = lookup(name)?;
        for trigger in task.triggers.iter() {
            builder.add_trigger(parent, lookup(trigger)?)?;
        }
    }

    let seeds = cfg
        .seed
        .iter()
        .map(|seed| Ok((lookup(&seed.task)?, seed.payload)))
        .collect::<Result<Vec<_>>>()?;

    Ok(ConfiguredGraph {
        graph: builder.build(),
        seeds,
    })
}
