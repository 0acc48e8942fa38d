//! Deferred work for the next update pass.
//!
//! The host drives the queue: it calls [`TickQueue::run_tick`] once per
//! update pass, after the pass has finished observing state. Work scheduled
//! while a tick runs waits for the following tick.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

type Task = Box<dyn FnOnce() + Send>;

/// Shared FIFO of tasks deferred to the next tick. Clones share the queue.
#[derive(Clone, Default)]
pub struct TickQueue {
    tasks: Arc<Mutex<VecDeque<Task>>>,
}

impl std::fmt::Debug for TickQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TickQueue")
            .field("pending", &self.pending())
            .finish()
    }
}

impl TickQueue {
    /// Empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `task` on the next tick.
    pub fn schedule(&self, task: impl FnOnce() + Send + 'static) {
        self.tasks.lock().push_back(Box::new(task));
    }

    /// Run every task queued before this call, in order.
    ///
    /// Returns how many ran. The queue is not locked while tasks run, so they
    /// may schedule more work.
    pub fn run_tick(&self) -> usize {
        let batch = std::mem::take(&mut *self.tasks.lock());
        let count = batch.len();
        for task in batch {
            task();
        }
        if count > 0 {
            tracing::trace!(count, "tick ran");
        }
        count
    }

    /// Tasks waiting for the next tick.
    pub fn pending(&self) -> usize {
        self.tasks.lock().len()
    }

    /// Whether nothing is waiting.
    pub fn is_idle(&self) -> bool {
        self.pending() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_runs_in_order() {
        let queue = TickQueue::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        for i in 0..3 {
            let log = log.clone();
            queue.schedule(move || log.lock().push(i));
        }
        assert_eq!(queue.pending(), 3);
        assert_eq!(queue.run_tick(), 3);
        assert_eq!(*log.lock(), vec![0, 1, 2]);
        assert!(queue.is_idle());
    }

    #[test]
    fn test_work_scheduled_during_tick_waits() {
        let queue = TickQueue::new();
        let hits = Arc::new(AtomicUsize::new(0));
        {
            let queue2 = queue.clone();
            let hits = hits.clone();
            queue.schedule(move || {
                queue2.schedule(move || {
                    hits.fetch_add(1, Ordering::SeqCst);
                });
            });
        }
        assert_eq!(queue.run_tick(), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(queue.run_tick(), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
