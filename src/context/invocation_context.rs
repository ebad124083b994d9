//! # Invocation Context
//!
//! The object handed to a handler. Its completion methods drive the
//! invocation's state machine and the process terminator.
//!
//! ## Completion semantics
//!
//! - The first `succeed`/`fail` decides the outcome; the outcome never changes.
//! - `succeed` after conclusion does nothing at all.
//! - Every `fail` writes an `{"errorMessage": ...}` line, even after conclusion.
//! - Exit is scheduled on the turn queue, never performed inline: deferred
//!   work queued before the completion call still runs, work queued after it
//!   does not.

use std::fmt::{self, Write as _};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::metadata::ContextMetadata;
use crate::config::RuntimeConfig;
use crate::constants::{defaults, exit_codes, messages};
use crate::error::HandlerError;
use crate::execution::{ProcessTerminator, TurnQueue};
use crate::output::SharedOutput;
use crate::state_machine::{
    CompletionEvent, InvocationState, InvocationStateMachine, Outcome, StateMachineError,
};

/// Log record written by `fail`
#[derive(Serialize)]
struct ErrorRecord<'a> {
    #[serde(rename = "errorMessage")]
    error_message: Option<&'a str>,
}

struct ContextInner {
    metadata: ContextMetadata,
    deadline: Instant,
    machine: Mutex<InvocationStateMachine>,
    terminator: ProcessTerminator,
    queue: TurnQueue,
    output: SharedOutput,
}

/// Handle to the single invocation's context.
///
/// Cloning is cheap and every clone refers to the same invocation, so deferred
/// closures can carry their own handle.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use lambda_bootstrap::config::RuntimeConfig;
/// use lambda_bootstrap::context::InvocationContext;
/// use lambda_bootstrap::execution::{QueueExit, TurnQueue};
/// use lambda_bootstrap::output::CapturedOutput;
///
/// let queue = TurnQueue::new();
/// let output = CapturedOutput::new();
/// let ctx = InvocationContext::new(&RuntimeConfig::default(), queue.clone(), Arc::new(output.clone()));
///
/// ctx.fail("X");
/// ctx.fail("X");
///
/// assert_eq!(output.log_lines(), vec![r#"{"errorMessage":"X"}"#; 2]);
/// assert_eq!(queue.run(), QueueExit::Terminated { code: 1, dropped: 0 });
/// ```
#[derive(Clone)]
pub struct InvocationContext {
    inner: Arc<ContextInner>,
}

impl InvocationContext {
    /// Create the context; the deadline starts counting now
    pub fn new(config: &RuntimeConfig, queue: TurnQueue, output: SharedOutput) -> Self {
        let started = Instant::now();
        let deadline = started.checked_add(config.timeout).unwrap_or_else(|| {
            warn!(
                timeout_secs = config.timeout.as_secs(),
                "Timeout not representable, using default"
            );
            started + Duration::from_secs(defaults::TIMEOUT_SECONDS)
        });

        Self {
            inner: Arc::new(ContextInner {
                metadata: ContextMetadata::from_config(config),
                deadline,
                machine: Mutex::new(InvocationStateMachine::new()),
                terminator: ProcessTerminator::new(queue.clone()),
                queue,
                output,
            }),
        }
    }

    /// Conclude successfully with `result`.
    ///
    /// `()` or `None` serialize to `null`. A result that cannot be serialized
    /// turns this call into a failure.
    pub fn succeed<T: Serialize>(&self, result: T) {
        if self.is_concluded() {
            return;
        }

        // Serialization runs user code; no lock may be held here
        let body = match serde_json::to_string(&result) {
            Ok(body) => body,
            Err(e) => {
                debug!(error = %e, "Result could not be serialized");
                self.fail(&format!("{}: {e}", messages::UNSERIALIZABLE_RESULT));
                return;
            }
        };

        match self.conclude(CompletionEvent::Succeed(body)) {
            Ok(()) => {
                self.inner.terminator.schedule_exit(exit_codes::SUCCESS);
            }
            Err(e) => debug!(error = %e, "succeed() ignored"),
        }
    }

    /// Conclude with a failure described by `error`
    pub fn fail<E: fmt::Display + ?Sized>(&self, error: &E) {
        self.fail_with(Some(error));
    }

    /// Conclude with a failure that carries no error value (`errorMessage` is `null`)
    pub fn fail_empty(&self) {
        self.fail_with::<str>(None);
    }

    /// Callback-style completion: `Err` behaves as [`fail`](Self::fail),
    /// `Ok` as [`succeed`](Self::succeed)
    pub fn done<T: Serialize, E: fmt::Display>(&self, result: Result<T, E>) {
        match result {
            Err(error) => self.fail(&error),
            Ok(value) => self.succeed(value),
        }
    }

    fn fail_with<E: fmt::Display + ?Sized>(&self, error: Option<&E>) {
        let normalized = match normalize_error(error) {
            Ok(normalized) => normalized,
            Err(_) => Some(messages::UNRENDERABLE_ERROR.to_string()),
        };

        if let Err(e) = self.conclude(CompletionEvent::Fail(normalized.clone())) {
            debug!(error = %e, "fail() after conclusion, logging only");
        }
        self.inner.terminator.schedule_exit(exit_codes::FAILURE);

        let record = ErrorRecord {
            error_message: normalized.as_deref(),
        };
        let line = match serde_json::to_string(&record) {
            Ok(line) => line,
            Err(_) => normalized.unwrap_or_else(|| "null".to_string()),
        };
        self.inner.output.log_line(&line);
    }

    fn conclude(&self, event: CompletionEvent) -> Result<(), StateMachineError> {
        let mut machine = self.inner.machine.lock();
        let outcome = machine.transition(event)?;
        info!(
            request_id = %self.inner.metadata.aws_request_id,
            success = outcome.is_success(),
            "Invocation concluded"
        );
        Ok(())
    }

    /// Milliseconds until the deadline, never negative
    pub fn get_remaining_time_in_millis(&self) -> u64 {
        let remaining = self
            .inner
            .deadline
            .saturating_duration_since(Instant::now());
        u64::try_from(remaining.as_millis()).unwrap_or(u64::MAX)
    }

    /// Write one line to the log stream; works before and after conclusion
    pub fn log(&self, message: impl AsRef<str>) {
        self.inner.output.log_line(message.as_ref());
    }

    /// Queue work for a later turn, the way a handler schedules a callback
    pub fn defer<F>(&self, task: F)
    where
        F: FnOnce() -> Result<(), HandlerError> + Send + 'static,
    {
        self.inner.queue.defer(task);
    }

    pub fn state(&self) -> InvocationState {
        self.inner.machine.lock().current_state()
    }

    pub fn is_concluded(&self) -> bool {
        self.state().is_terminal()
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.inner.machine.lock().outcome().cloned()
    }

    pub fn metadata(&self) -> &ContextMetadata {
        &self.inner.metadata
    }

    pub fn function_name(&self) -> &str {
        &self.inner.metadata.function_name
    }

    pub fn function_version(&self) -> &str {
        &self.inner.metadata.function_version
    }

    pub fn invoked_function_arn(&self) -> &str {
        &self.inner.metadata.invoked_function_arn
    }

    pub fn memory_limit_in_mb(&self) -> &str {
        &self.inner.metadata.memory_limit_in_mb
    }

    pub fn aws_request_id(&self) -> &str {
        &self.inner.metadata.aws_request_id
    }

    pub fn log_group_name(&self) -> &str {
        &self.inner.metadata.log_group_name
    }

    pub fn log_stream_name(&self) -> &str {
        &self.inner.metadata.log_stream_name
    }

    pub fn identity(&self) -> Option<&serde_json::Value> {
        self.inner.metadata.identity.as_ref()
    }

    pub fn client_context(&self) -> Option<&serde_json::Value> {
        self.inner.metadata.client_context.as_ref()
    }

    pub(crate) fn terminator(&self) -> &ProcessTerminator {
        &self.inner.terminator
    }

    pub(crate) fn output(&self) -> &SharedOutput {
        &self.inner.output
    }
}

impl fmt::Debug for InvocationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvocationContext")
            .field("metadata", &self.inner.metadata)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

/// Render the error value; a failing `Display` surfaces as `fmt::Error`
fn normalize_error<E: fmt::Display + ?Sized>(error: Option<&E>) -> Result<Option<String>, fmt::Error> {
    match error {
        None => Ok(None),
        Some(error) => {
            let mut rendered = String::new();
            write!(rendered, "{error}")?;
            Ok(Some(rendered))
        }
    }
}
