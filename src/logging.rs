// src/logging.rs

//! Subscriber setup for the `fandag` binary.
//!
//! Scheduler diagnostics (seeds, pops, trigger pushes, failures) are plain
//! `tracing` events; this module only decides which of them reach stderr.
//! The run report is printed on stdout, so the two never interleave.
//!
//! `--log-level` wins over `FANDAG_LOG`. The variable accepts either a bare
//! level (`debug`) or a full filter directive (`fandag::engine=trace,info`).
//! Anything unparseable falls back to `info`.

use anyhow::Result;
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::LogLevel;

/// Env var read when no `--log-level` flag is given.
pub const LOG_ENV: &str = "FANDAG_LOG";

impl From<LogLevel> for Level {
    fn from(lvl: LogLevel) -> Self {
        match lvl {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env = std::env::var(LOG_ENV).ok();

    fmt()
        .with_env_filter(resolve_filter(cli_level, env.as_deref()))
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))?;

    Ok(())
}

/// Filter for a flag value and the raw contents of `FANDAG_LOG`.
pub fn resolve_filter(cli_level: Option<LogLevel>, env: Option<&str>) -> EnvFilter {
    if let Some(lvl) = cli_level {
        return level_filter(Level::from(lvl));
    }
    match env.map(str::trim).filter(|raw| !raw.is_empty()) {
        Some(raw) => match parse_level_str(raw) {
            Some(level) => level_filter(level),
            None => EnvFilter::try_new(raw).unwrap_or_else(|_| level_filter(Level::INFO)),
        },
        None => level_filter(Level::INFO),
    }
}

fn level_filter(level: Level) -> EnvFilter {
    EnvFilter::new(level.as_str().to_lowercase())
}

/// Parse a bare level name (case-insensitive; `warning` is accepted).
pub fn parse_level_str(s: &str) -> Option<Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(Level::ERROR),
        "warn" | "warning" => Some(Level::WARN),
        "info" => Some(Level::INFO),
        "debug" => Some(Level::DEBUG),
        "trace" => Some(Level::TRACE),
        _ => None,
    }
}
