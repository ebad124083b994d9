//! # Execution
//!
//! Cooperative deferral for a single invocation: the [`TurnQueue`] holding
//! deferred actions and the [`ProcessTerminator`] that schedules the exit
//! action onto it.

pub(crate) mod guard;
pub mod terminator;
pub mod turn_queue;

pub use terminator::ProcessTerminator;
pub use turn_queue::{DeferredTask, QueueExit, TurnQueue};
