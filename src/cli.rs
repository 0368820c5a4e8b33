// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::loader::default_config_path;
use crate::types::{FailurePolicy, TerminationMode};

/// Command-line arguments for `fandag`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "fandag",
    version,
    about = "Run a task graph depth-first on a bounded worker pool.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Fandag.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value_os_t = default_config_path())]
    pub config: PathBuf,

    /// Number of workers (overrides `[config].workers`).
    #[arg(long, value_name = "N")]
    pub workers: Option<usize>,

    /// Maximum simultaneously running actions (overrides `[config].concurrency`).
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// When the run ends: `drain` or `daemon` (overrides `[config].termination`).
    #[arg(long, value_name = "MODE", conflicts_with = "daemon")]
    pub termination: Option<TerminationMode>,

    /// Shorthand for `--termination daemon`: keep polling until Ctrl-C.
    #[arg(long)]
    pub daemon: bool,

    /// `isolate` or `fail_fast` (overrides `[config].failure_policy`).
    #[arg(long, value_name = "POLICY", conflicts_with = "fail_fast")]
    pub failure_policy: Option<FailurePolicy>,

    /// Shorthand for `--failure-policy fail_fast`.
    #[arg(long)]
    pub fail_fast: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `FANDAG_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the graph, but don't execute any actions.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
