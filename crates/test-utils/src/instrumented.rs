//! Instrumented actions for exercising the scheduler.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::anyhow;
use fandag::exec::{Action, ActionFuture, from_fn};

/// One recorded action invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub task: String,
    pub input: i64,
}

/// Shared log of action invocations across every task it hands out.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    calls: Arc<Mutex<Vec<Call>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Action that records its call and returns its input unchanged.
    pub fn identity(&self, task: &str) -> Arc<dyn Action<i64>> {
        self.map(task, |x| x)
    }

    /// Action that records its call and returns `f(input)`.
    pub fn map(&self, task: &str, f: fn(i64) -> i64) -> Arc<dyn Action<i64>> {
        let calls = Arc::clone(&self.calls);
        let task = task.to_string();
        from_fn(move |input: i64| {
            calls.lock().unwrap().push(Call {
                task: task.clone(),
                input,
            });
            async move { Ok::<_, anyhow::Error>(f(input)) }
        })
    }

    /// Action that records its call, sleeps for `delay`, then returns its input.
    pub fn sleeping(&self, task: &str, delay: Duration) -> Arc<dyn Action<i64>> {
        let calls = Arc::clone(&self.calls);
        let task = task.to_string();
        from_fn(move |input: i64| {
            calls.lock().unwrap().push(Call {
                task: task.clone(),
                input,
            });
            async move {
                tokio::time::sleep(delay).await;
                Ok::<_, anyhow::Error>(input)
            }
        })
    }

    /// Action that records its call and then fails.
    pub fn failing(&self, task: &str) -> Arc<dyn Action<i64>> {
        let calls = Arc::clone(&self.calls);
        let task = task.to_string();
        from_fn(move |input: i64| {
            calls.lock().unwrap().push(Call {
                task: task.clone(),
                input,
            });
            let task = task.clone();
            async move { Err::<i64, _>(anyhow!("{task} failed on purpose")) }
        })
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Recorded calls for one task, in call order.
    pub fn calls_for(&self, task: &str) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| c.task == task)
            .collect()
    }

    /// Task names in call order.
    pub fn order(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.task).collect()
    }
}

/// Measures how many instrumented actions are running at the same moment.
#[derive(Debug, Clone, Default)]
pub struct ConcurrencyMeter {
    active: Arc<AtomicUsize>,
    max_seen: Arc<AtomicUsize>,
    total: Arc<AtomicUsize>,
}

impl ConcurrencyMeter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Action that counts itself active for `hold`, then returns its input.
    pub fn action(&self, hold: Duration) -> Arc<dyn Action<i64>> {
        Arc::new(MeteredAction {
            meter: self.clone(),
            hold,
        })
    }

    pub fn max_observed(&self) -> usize {
        self.max_seen.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }

    pub fn active_now(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }
}

struct MeteredAction {
    meter: ConcurrencyMeter,
    hold: Duration,
}

impl Action<i64> for MeteredAction {
    fn call(&self, input: i64) -> ActionFuture<'_, i64> {
        Box::pin(async move {
            let now = self.meter.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.meter.max_seen.fetch_max(now, Ordering::SeqCst);
            self.meter.total.fetch_add(1, Ordering::SeqCst);

            tokio::time::sleep(self.hold).await;

            self.meter.active.fetch_sub(1, Ordering::SeqCst);
            Ok::<_, anyhow::Error>(input)
        })
    }
}

/// Action that panics when called.
pub fn panicking(message: &'static str) -> Arc<dyn Action<i64>> {
    from_fn(move |_input: i64| async move { explode(message) })
}

fn explode(message: &str) -> anyhow::Result<i64> {
    panic!("{message}")
}
