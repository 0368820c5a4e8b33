#![allow(dead_code)]

use std::collections::BTreeMap;
use fandag::config::{
    ActionKind, ConfigFile, ConfigSection, SeedConfig, TaskConfig, validate_config,
};
use fandag::types::{FailurePolicy, TerminationMode};

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: ConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: ConfigFile {
                config: ConfigSection::default(),
                task: BTreeMap::new(),
                seed: Vec::new(),
            },
        }
    }

    pub fn with_task(mut self, name: &str, task: TaskConfig) -> Self {
        self.config.task.insert(name.to_string(), task);
        self
    }

    pub fn with_seed(mut self, task: &str, payload: i64) -> Self {
        self.config.seed.push(SeedConfig {
            task: task.to_string(),
            payload,
        });
        self
    }

    pub fn workers(mut self, workers: usize) -> Self {
        self.config.config.workers = workers;
        self
    }

    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.config.config.concurrency = Some(concurrency);
        self
    }

    pub fn termination(mut self, mode: TerminationMode) -> Self {
        self.config.config.termination = mode;
        self
    }

    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.config.config.failure_policy = policy;
        self
    }

    pub fn poll_interval_ms(mut self, ms: u64) -> Self {
        self.config.config.poll_interval_ms = ms;
        self
    }

    /// Build without validation (for testing the validator itself).
    pub fn build_unchecked(self) -> ConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        validate_config(&self.config).expect("Failed to build valid config from builder");
        self.config
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `TaskConfig`.
pub struct TaskConfigBuilder {
    task: TaskConfig,
}

impl TaskConfigBuilder {
    pub fn new(action: ActionKind) -> Self {
        Self {
            task: TaskConfig {
                action,
                ..TaskConfig::default()
            },
        }
    }

    pub fn identity() -> Self {
        Self::new(ActionKind::Identity)
    }

    pub fn multiply(factor: i64) -> Self {
        Self::new(ActionKind::Multiply).factor(factor)
    }

    pub fn add(amount: i64) -> Self {
        let mut b = Self::new(ActionKind::Add);
        b.task.amount = Some(amount);
        b
    }

    pub fn fail() -> Self {
        Self::new(ActionKind::Fail)
    }

    pub fn factor(mut self, factor: i64) -> Self {
        self.task.factor = Some(factor);
        self
    }

    pub fn message(mut self, message: &str) -> Self {
        self.task.message = Some(message.to_string());
        self
    }

    pub fn delay_ms(mut self, ms: u64) -> Self {
        self.task.delay_ms = Some(ms);
        self
    }

    pub fn trigger(mut self, task: &str) -> Self {
        self.task.triggers.push(task.to_string());
        self
    }

    pub fn build(self) -> TaskConfig {
        self.task
    }
}
