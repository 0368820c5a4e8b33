// src/config/model.rs

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;

use crate::engine::SchedulerOptions;
use crate::types::{FailurePolicy, TerminationMode};

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [config]
/// workers = 4
/// concurrency = 2
/// termination = "drain"
/// failure_policy = "isolate"
///
/// [task.double]
/// action = "multiply"
/// factor = 2
/// delay_ms = 100
/// triggers = ["report"]
///
/// [task.report]
/// action = "identity"
///
/// [[seed]]
/// task = "double"
/// payload = 5
/// ```
///
/// All sections are optional at parse time; `config::validate` rejects files
/// without tasks or seeds.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    /// Pool behaviour from `[config]`.
    #[serde(default)]
    pub config: ConfigSection,

    /// All tasks from `[task.<name>]`, keyed by task name.
    #[serde(default)]
    pub task: BTreeMap<String, TaskConfig>,

    /// Initial depth-0 activities from `[[seed]]`.
    #[serde(default)]
    pub seed: Vec<SeedConfig>,
}

/// `[config]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigSection {
    /// Number of workers draining the queue.
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Maximum simultaneously running actions. Defaults to `workers`.
    #[serde(default)]
    pub concurrency: Option<usize>,

    /// `"drain"` (default) or `"daemon"`.
    #[serde(default)]
    pub termination: TerminationMode,

    /// `"isolate"` (default) or `"fail_fast"`.
    #[serde(default)]
    pub failure_policy: FailurePolicy,

    /// How long an idle worker sleeps between queue checks.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_workers() -> usize {
    4
}

fn default_poll_interval_ms() -> u64 {
    50
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            concurrency: None,
            termination: TerminationMode::default(),
            failure_policy: FailurePolicy::default(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl ConfigSection {
    pub fn scheduler_options(&self) -> SchedulerOptions {
        SchedulerOptions {
            workers: self.workers,
            concurrency: self.concurrency,
            termination: self.termination,
            failure_policy: self.failure_policy,
            poll_interval: Duration::from_millis(self.poll_interval_ms),
        }
    }
}

/// Which built-in action a task runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Identity,
    Multiply,
    Add,
    Fail,
}

impl Default for ActionKind {
    fn default() -> Self {
        ActionKind::Identity
    }
}

/// `[task.<name>]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskConfig {
    #[serde(default)]
    pub action: ActionKind,

    /// Multiplier for `action = "multiply"`.
    #[serde(default)]
    pub factor: Option<i64>,

    /// Addend for `action = "add"`.
    #[serde(default)]
    pub amount: Option<i64>,

    /// Error message for `action = "fail"`.
    #[serde(default)]
    pub message: Option<String>,

    /// Simulated I/O time before the action produces its result.
    #[serde(default)]
    pub delay_ms: Option<u64>,

    /// Tasks queued, in this order, one level deeper after success.
    #[serde(default)]
    pub triggers: Vec<String>,
}

/// One `[[seed]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedConfig {
    pub task: String,
    #[serde(default)]
    pub payload: i64,
}
