// src/exec/builtin.rs

//! Built-in `i64` actions used by config-driven task graphs.

use std::time::Duration;

use anyhow::anyhow;
use tracing::debug;

use crate::config::model::{ActionKind, TaskConfig};
use crate::errors::{Result, SchedulerError};
use crate::exec::action::{Action, ActionFuture};

/// What a built-in action does with its input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Identity,
    Multiply(i64),
    Add(i64),
    Fail(String),
}

/// An [`Operation`] with an optional simulated I/O delay in front of it.
#[derive(Debug, Clone)]
pub struct BuiltinAction {
    name: String,
    op: Operation,
    delay: Option<Duration>,
}

impl BuiltinAction {
    pub fn new(name: impl Into<String>, op: Operation, delay: Option<Duration>) -> Self {
        Self {
            name: name.into(),
            op,
            delay,
        }
    }

    /// Build the action described by `[task.<name>]`.
    pub fn from_config(name: &str, cfg: &TaskConfig) -> Result<Self> {
        let op = match cfg.action {
            ActionKind::Identity => Operation::Identity,
            ActionKind::Multiply => Operation::Multiply(cfg.factor.ok_or_else(|| {
                SchedulerError::ConfigError(format!(
                    "task '{name}' uses action \"multiply\" but has no `factor`"
                ))
            })?),
            ActionKind::Add => Operation::Add(cfg.amount.ok_or_else(|| {
                SchedulerError::ConfigError(format!(
                    "task '{name}' uses action \"add\" but has no `amount`"
                ))
            })?),
            ActionKind::Fail => Operation::Fail(
                cfg.message
                    .clone()
                    .unwrap_or_else(|| format!("task '{name}' failed on purpose")),
            ),
        };

        let delay = cfg.delay_ms.map(Duration::from_millis);
        Ok(Self::new(name, op, delay))
    }

    pub fn operation(&self) -> &Operation {
        &self.op
    }

    fn apply(&self, input: i64) -> anyhow::Result<i64> {
        match &self.op {
            Operation::Identity => Ok(input),
            Operation::Multiply(factor) => input
                .checked_mul(*factor)
                .ok_or_else(|| anyhow!("{input} * {factor} overflows i64")),
            Operation::Add(amount) => input
                .checked_add(*amount)
                .ok_or_else(|| anyhow!("{input} + {amount} overflows i64")),
            Operation::Fail(message) => Err(anyhow!("{message}")),
        }
    }
}

impl Action<i64> for BuiltinAction {
    fn call(&self, input: i64) -> ActionFuture<'_, i64> {
        Box::pin(async move {
            if let Some(delay) = self.delay {
                debug!(task = %self.name, ?delay, "simulating I/O delay");
                tokio::time::sleep(delay).await;
            }
            self.apply(input)
        })
    }
}
