// src/config/validate.rs

use crate::config::model::{ActionKind, ConfigFile};
use crate::errors::{Result, SchedulerError};

/// Run semantic validation against a loaded configuration.
///
/// This checks:
/// - there is at least one task and at least one seed
/// - `workers >= 1` and, when set, `concurrency >= 1`
/// - all `triggers` and seeds refer to existing tasks
/// - each task carries the parameter its action needs
///
/// It does **not** reject trigger cycles: a cyclic graph is legal, it just
/// never drains (the dry-run output reports it as unbounded).
pub fn validate_config(cfg: &ConfigFile) -> Result<()> {
    ensure_has_tasks(cfg)?;
    validate_global_config(cfg)?;
    validate_triggers(cfg)?;
    validate_actions(cfg)?;
    validate_seeds(cfg)?;
    Ok(())
}

fn config_error(msg: String) -> SchedulerError {
    SchedulerError::ConfigError(msg)
}

fn ensure_has_tasks(cfg: &ConfigFile) -> Result<()> {
    if cfg.task.is_empty() {
        return Err(config_error(
            "config must contain at least one [task.<name>] section".to_string(),
        ));
    }
    Ok(())
}

fn validate_global_config(cfg: &ConfigFile) -> Result<()> {
    if cfg.config.workers == 0 {
        return Err(config_error("[config].workers must be >= 1 (got 0)".to_string()));
    }
    if cfg.config.concurrency == Some(0) {
        return Err(config_error(
            "[config].concurrency must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_triggers(cfg: &ConfigFile) -> Result<()> {
    for (name, task) in cfg.task.iter() {
        for trigger in task.triggers.iter() {
            if !cfg.task.contains_key(trigger) {
                return Err(config_error(format!(
                    "task '{}' has unknown trigger '{}' in `triggers`",
                    name, trigger
                )));
            }
        }
    }
    Ok(())
}

fn validate_actions(cfg: &ConfigFile) -> Result<()> {
    for (name, task) in cfg.task.iter() {
        match task.action {
            ActionKind::Multiply if task.factor.is_none() => {
                return Err(config_error(format!(
                    "task '{}' uses action \"multiply\" but has no `factor`",
                    name
                )));
            }
            ActionKind::Add if task.amount.is_none() => {
                return Err(config_error(format!(
                    "task '{}' uses action \"add\" but has no `amount`",
                    name
                )));
            }
            _ => {}
        }
    }
    Ok(())
}

fn validate_seeds(cfg: &ConfigFile) -> Result<()> {
    if cfg.seed.is_empty() {
        return Err(config_error(
            "config must contain at least one [[seed]] entry".to_string(),
        ));
    }
    for seed in cfg.seed.iter() {
        if !cfg.task.contains_key(&seed.task) {
            return Err(config_error(format!(
                "seed refers to unknown task '{}'",
                seed.task
            )));
        }
    }
    Ok(())
}
