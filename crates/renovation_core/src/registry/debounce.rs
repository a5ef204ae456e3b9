//! Cancellable delayed write task.
//!
//! # Invariants
//! - At most one write is pending at any time.
//! - Scheduling aborts the previous pending write before arming a new one.
//! - Without a runtime, writes run immediately on the caller thread.

use log::debug;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

pub(crate) struct SaveScheduler {
    delay: Duration,
    runtime: Option<Handle>,
    pending: Option<JoinHandle<()>>,
}

impl SaveScheduler {
    pub(crate) fn new(delay: Duration, runtime: Option<Handle>) -> Self {
        Self {
            delay,
            runtime,
            pending: None,
        }
    }

    /// Replaces any pending write with `write`, run after the delay.
    pub(crate) fn schedule<F>(&mut self, write: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if self.cancel() {
            debug!("event=save_debounced module=registry status=ok");
        }

        match &self.runtime {
            Some(runtime) => {
                let delay = self.delay;
                self.pending = Some(runtime.spawn(async move {
                    tokio::time::sleep(delay).await;
                    write();
                }));
            }
            None => write(),
        }
    }

    /// Aborts the pending write. Returns whether one was still waiting.
    pub(crate) fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(task) => {
                let waiting = !task.is_finished();
                task.abort();
                waiting
            }
            None => false,
        }
    }

    pub(crate) fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }
}
