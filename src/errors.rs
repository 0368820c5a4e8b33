// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchedulerError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Action of task '{task}' failed at depth {depth}: {source}")]
    ActionFailed {
        task: String,
        depth: u32,
        #[source]
        source: anyhow::Error,
    },

    #[error("Action of task '{task}' panicked at depth {depth}")]
    ActionPanicked { task: String, depth: u32 },

    #[error("Concurrency gate closed")]
    GateClosed,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, SchedulerError>;
