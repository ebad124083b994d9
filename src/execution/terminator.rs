//! Process termination scheduling

use std::sync::{Arc, OnceLock};

use tracing::{debug, info};

use crate::execution::turn_queue::TurnQueue;

/// Schedules the end of the invocation exactly once.
///
/// The only state is the scheduled exit code. Scheduling enqueues the exit
/// action on the turn queue instead of exiting immediately, so deferred work
/// that is already queued still runs first.
#[derive(Debug, Clone)]
pub struct ProcessTerminator {
    queue: TurnQueue,
    scheduled: Arc<OnceLock<i32>>,
}

impl ProcessTerminator {
    pub fn new(queue: TurnQueue) -> Self {
        Self {
            queue,
            scheduled: Arc::new(OnceLock::new()),
        }
    }

    /// Schedule exit with `code`; returns `false` if an exit was already scheduled
    pub(crate) fn schedule_exit(&self, code: i32) -> bool {
        if self.scheduled.set(code).is_err() {
            debug!(
                requested = code,
                scheduled = self.scheduled_code(),
                "Exit already scheduled"
            );
            return false;
        }

        self.queue.enqueue_exit(code);
        info!(exit_code = code, "Process exit scheduled for next turn");
        true
    }

    pub fn is_scheduled(&self) -> bool {
        self.scheduled.get().is_some()
    }

    pub fn scheduled_code(&self) -> Option<i32> {
        self.scheduled.get().copied()
    }
}
