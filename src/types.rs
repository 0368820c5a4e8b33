use std::str::FromStr;
use serde::Deserialize;

/// How a run decides that it is finished.
///
/// - `Drain`: stop once every seeded and triggered activity has completed and
///   nothing is left in the queue (default behaviour).
/// - `Daemon`: keep workers polling the queue until an explicit shutdown is
///   requested, even when no work is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerminationMode {
    Drain,
    Daemon,
}

impl Default for TerminationMode {
    fn default() -> Self {
        TerminationMode::Drain
    }
}

impl FromStr for TerminationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "drain" => Ok(TerminationMode::Drain),
            "daemon" => Ok(TerminationMode::Daemon),
            other => Err(format!(
                "invalid termination: {other} (expected \"drain\" or \"daemon\")"
            )),
        }
    }
}

/// What a worker does when a task's action fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Log the failure, enqueue nothing for that activity, keep the pool running.
    Isolate,
    /// Stop the whole run and surface the failure from `Scheduler::run`.
    FailFast,
}

impl Default for FailurePolicy {
    fn default() -> Self {
        FailurePolicy::Isolate
    }
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "isolate" => Ok(FailurePolicy::Isolate),
            "fail_fast" => Ok(FailurePolicy::FailFast),
            other => Err(format!(
                "invalid failure_policy: {other} (expected \"isolate\" or \"fail_fast\")"
            )),
        }
    }
}
