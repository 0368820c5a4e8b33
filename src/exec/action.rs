// src/exec/action.rs

//! Pluggable action abstraction.
//!
//! The scheduler never knows what a task does; it only calls an `Action`
//! with the activity's payload and awaits the result. Production graphs use
//! the [`builtin`](super::builtin) actions or closures wrapped with
//! [`from_fn`]; tests provide instrumented actions that record calls or measure
//! concurrency.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Boxed future returned by [`Action::call`].
pub type ActionFuture<'a, P> = Pin<Box<dyn Future<Output = anyhow::Result<P>> + Send + 'a>>;

/// Trait abstracting the work a task performs.
///
/// Implementations must tolerate being called concurrently from several
/// workers with different inputs, and must not mutate shared state beyond
/// what they are given.
pub trait Action<P>: Send + Sync {
    fn call(&self, input: P) -> ActionFuture<'_, P>;
}

/// Adapter turning an async closure into an [`Action`].
pub struct FnAction<F> {
    f: F,
}

impl<F> fmt::Debug for FnAction<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnAction").finish_non_exhaustive()
    }
}

impl<P, F, Fut> Action<P> for FnAction<F>
where
    F: Fn(P) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<P>> + Send + 'static,
{
    fn call(&self, input: P) -> ActionFuture<'_, P> {
        Box::pin((self.f)(input))
    }
}

/// Wrap an async closure as a shareable action.
///
/// ```ignore
/// let double = from_fn(|x: i64| async move { Ok(x * 2) });
/// ```
pub fn from_fn<P, F, Fut>(f: F) -> Arc<dyn Action<P>>
where
    P: 'static,
    F: Fn(P) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<P>> + Send + 'static,
{
    Arc::new(FnAction { f })
}
