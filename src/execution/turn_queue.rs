//! Cooperative turn queue for deferred work

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::error::HandlerError;
use crate::execution::guard::run_guarded;

/// Deferred action queued by a handler or by the runtime
pub type DeferredTask = Box<dyn FnOnce() -> Result<(), HandlerError> + Send + 'static>;

enum Turn {
    Task { id: u64, task: DeferredTask },
    Exit { code: i32 },
}

#[derive(Default)]
struct QueueState {
    turns: VecDeque<Turn>,
    next_id: u64,
}

/// How a run of the queue ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueExit {
    /// The exit action ran; `dropped` deferred actions queued behind it never ran
    Terminated { code: i32, dropped: usize },
    /// A deferred action raised an error nothing caught
    Uncaught { error: HandlerError },
    /// Nothing left to run and no exit was scheduled
    Drained,
}

/// Single-level FIFO of deferred actions.
///
/// An action deferred during turn N runs after all synchronous work of turn N
/// and after every action queued before it. The exit action is an ordinary
/// entry in the same FIFO: whatever was queued ahead of it still runs,
/// whatever is queued behind it is discarded.
///
/// # Examples
///
/// ```rust
/// use lambda_bootstrap::execution::{QueueExit, TurnQueue};
///
/// let queue = TurnQueue::new();
/// queue.defer(|| Ok(()));
/// assert_eq!(queue.run(), QueueExit::Drained);
/// ```
#[derive(Clone, Default)]
pub struct TurnQueue {
    state: Arc<Mutex<QueueState>>,
}

impl TurnQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an action for a later turn
    pub fn defer<F>(&self, task: F)
    where
        F: FnOnce() -> Result<(), HandlerError> + Send + 'static,
    {
        let mut state = self.state.lock();
        let id = state.next_id;
        state.next_id += 1;
        state.turns.push_back(Turn::Task {
            id,
            task: Box::new(task),
        });
        trace!(task_id = id, queued = state.turns.len(), "Deferred task queued");
    }

    /// Queue the exit action; only the terminator does this
    pub(crate) fn enqueue_exit(&self, code: i32) {
        let mut state = self.state.lock();
        state.turns.push_back(Turn::Exit { code });
        debug!(exit_code = code, position = state.turns.len(), "Exit action queued");
    }

    /// Number of entries waiting to run
    pub fn pending(&self) -> usize {
        self.state.lock().turns.len()
    }

    /// Run queued turns until the exit action, an uncaught error or an empty queue.
    ///
    /// The lock is released while an action runs so it can defer more work.
    pub fn run(&self) -> QueueExit {
        loop {
            let next = self.state.lock().turns.pop_front();

            match next {
                None => {
                    debug!("Turn queue drained");
                    return QueueExit::Drained;
                }
                Some(Turn::Exit { code }) => {
                    let mut state = self.state.lock();
                    let dropped = state.turns.len();
                    state.turns.clear();
                    debug!(exit_code = code, dropped, "Exit action reached");
                    return QueueExit::Terminated { code, dropped };
                }
                Some(Turn::Task { id, task }) => {
                    trace!(task_id = id, "Running deferred task");
                    if let Err(error) = run_guarded(task) {
                        debug!(task_id = id, error = %error, "Deferred task raised");
                        return QueueExit::Uncaught { error };
                    }
                }
            }
        }
    }
}

impl std::fmt::Debug for TurnQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TurnQueue")
            .field("pending", &self.pending())
            .finish()
    }
}
