//! Cancellable delayed tasks for settling rapid input.
//!
//! Arming a [`Debouncer`] aborts whatever it had pending and schedules a new
//! task after the quiet period. Every arm hands the task a [`Ticket`]; a task
//! that finishes after it has been superseded can ask its ticket and drop
//! its result instead of publishing it.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::task::JoinHandle;

pub struct Debouncer {
    delay: Duration,
    generation: Arc<AtomicU64>,
    pending: Option<JoinHandle<()>>,
}

/// Identifies one arming of a [`Debouncer`]
#[derive(Clone)]
pub struct Ticket {
    id: u64,
    generation: Arc<AtomicU64>,
}

impl Ticket {
    /// False once the debouncer was re-armed or cancelled
    pub fn is_current(&self) -> bool {
        self.generation.load(Ordering::SeqCst) == self.id
    }
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: Arc::new(AtomicU64::new(0)),
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Run `task` after the delay unless re-armed or cancelled first
    pub fn arm<F, Fut>(&mut self, task: F)
    where
        F: FnOnce(Ticket) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.abort_pending();

        let id = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let ticket = Ticket {
            id,
            generation: Arc::clone(&self.generation),
        };
        let delay = self.delay;

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task(ticket).await;
        }));
    }

    /// Drop the pending task and invalidate every ticket handed out so far
    pub fn cancel(&mut self) {
        self.abort_pending();
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    fn abort_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            if !handle.is_finished() {
                tracing::trace!("Debounce timer re-armed, aborting pending task");
            }
            handle.abort();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.abort_pending();
    }
}
