// src/engine/queue.rs

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::Notify;
use tokio::sync::futures::Notified;
use tracing::trace;

use crate::graph::Activity;

/// Heap entry: an activity plus the sequence number it was pushed with.
#[derive(Debug)]
struct Queued<P> {
    seq: u64,
    activity: Activity<P>,
}

impl<P> PartialEq for Queued<P> {
    fn eq(&self, other: &Self) -> bool {
        self.activity.priority == other.activity.priority && self.seq == other.seq
    }
}

impl<P> Eq for Queued<P> {}

impl<P> PartialOrd for Queued<P> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<P> Ord for Queued<P> {
    /// Deeper activities first; among equal depths, the one pushed first.
    fn cmp(&self, other: &Self) -> Ordering {
        self.activity
            .priority
            .cmp(&other.activity.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

#[derive(Debug)]
struct Inner<P> {
    heap: BinaryHeap<Queued<P>>,
    next_seq: u64,
    /// Activities pushed but not yet reported done via `task_done`.
    outstanding: usize,
}

/// Priority queue of activities shared by every worker of a run.
///
/// Semantics:
/// - `pop` always returns the activity with the greatest priority among
///   those present, breaking ties in push order (queue-stable).
/// - An empty queue is a normal, transient state: `pop` returns `None` and
///   the caller decides whether to wait (see [`notified`](Self::notified)).
/// - Every push counts as outstanding work until the consumer calls
///   [`task_done`](Self::task_done). Because a worker pushes the triggered
///   children *before* reporting its own activity done, the outstanding
///   count can only reach zero once no further work can appear.
///
/// All state sits behind one mutex, so pushes that race with pops are
/// serialized, never lost.
#[derive(Debug)]
pub struct PriorityQueue<P> {
    inner: Mutex<Inner<P>>,
    pushed: Notify,
}

impl<P> Default for PriorityQueue<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> PriorityQueue<P> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                heap: BinaryHeap::new(),
                next_seq: 0,
                outstanding: 0,
            }),
            pushed: Notify::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<P>> {
        // The heap is never left half-updated, so a poisoned lock is still usable.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert an activity and wake one idle waiter.
    pub fn push(&self, activity: Activity<P>) {
        {
            let mut inner = self.lock();
            let seq = inner.next_seq;
            inner.next_seq += 1;
            inner.outstanding += 1;
            trace!(priority = activity.priority, seq, "queue push");
            inner.heap.push(Queued { seq, activity });
        }
        self.pushed.notify_one();
    }

    /// Remove and return the highest-priority activity, or `None` if empty.
    pub fn pop(&self) -> Option<Activity<P>> {
        self.lock().heap.pop().map(|q| q.activity)
    }

    /// Priority of the activity `pop` would return next.
    pub fn peek_priority(&self) -> Option<u32> {
        self.lock().heap.peek().map(|q| q.activity.priority)
    }

    /// Number of queued activities (diagnostics only).
    pub fn len(&self) -> usize {
        self.lock().heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().heap.is_empty()
    }

    /// Activities pushed and not yet marked done, queued or in flight.
    pub fn outstanding(&self) -> usize {
        self.lock().outstanding
    }

    /// Report that a popped activity has been fully handled (including
    /// pushing its triggered children).
    ///
    /// Returns `true` if this call brought the outstanding count to zero.
    pub fn task_done(&self) -> bool {
        let mut inner = self.lock();
        inner.outstanding = inner.outstanding.saturating_sub(1);
        inner.outstanding == 0
    }

    /// Future that resolves on the next push (or immediately if a push
    /// happened since the last wake-up nobody consumed).
    pub fn notified(&self) -> Notified<'_> {
        self.pushed.notified()
    }

    /// Drop every queued activity, returning how many were discarded.
    pub fn clear(&self) -> usize {
        let mut inner = self.lock();
        let dropped = inner.heap.len();
        inner.heap.clear();
        inner.outstanding = inner.outstanding.saturating_sub(dropped);
        dropped
    }
}
