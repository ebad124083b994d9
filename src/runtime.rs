//! # Bootstrap Runtime
//!
//! Composes one invocation: build the context from the configuration, dispatch
//! the handler, then run deferred turns until the scheduled exit.
//!
//! ```text
//! RuntimeConfig -> InvocationContext -> Dispatcher -> TurnQueue::run -> exit code
//! ```
//!
//! The runtime never calls `std::process::exit` itself; the binary does that
//! with the code in the returned [`InvocationReport`].

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info_span};

use crate::config::RuntimeConfig;
use crate::constants::{exit_codes, messages};
use crate::context::InvocationContext;
use crate::dispatch::{DispatchOutcome, Dispatcher};
use crate::execution::{QueueExit, TurnQueue};
use crate::logging::log_invocation_operation;
use crate::output::{SharedOutput, StdStreams};
use crate::payload::load_payload_or_default;
use crate::registry::HandlerRegistry;
use crate::state_machine::Outcome;

/// Result of running one invocation to its end
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationReport {
    pub exit_code: i32,
    /// Recorded outcome; `None` if the handler never concluded
    pub outcome: Option<Outcome>,
    pub dispatch: DispatchOutcome,
    /// Deferred actions discarded because they were queued behind the exit
    pub dropped_tasks: usize,
}

impl InvocationReport {
    pub fn succeeded(&self) -> bool {
        self.exit_code == exit_codes::SUCCESS
    }
}

/// One-shot runtime for a single invocation
pub struct Bootstrap {
    config: RuntimeConfig,
    registry: HandlerRegistry,
    output: SharedOutput,
}

impl Bootstrap {
    pub fn new(config: RuntimeConfig, registry: HandlerRegistry) -> Self {
        Self {
            config,
            registry,
            output: Arc::new(StdStreams),
        }
    }

    pub fn with_output(mut self, output: SharedOutput) -> Self {
        self.output = output;
        self
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Run the invocation with the payload named by the configuration
    pub fn run(&self, reference: Option<&str>) -> InvocationReport {
        let payload =
            load_payload_or_default(self.config.payload_file.as_deref(), self.output.as_ref());
        self.run_with_payload(reference, payload)
    }

    /// Run the invocation with an explicit payload
    pub fn run_with_payload(&self, reference: Option<&str>, payload: Value) -> InvocationReport {
        let span = info_span!(
            "invocation",
            request_id = %self.config.request_id,
            function_name = %self.config.function_name
        );
        let _entered = span.enter();

        let queue = TurnQueue::new();
        let context = InvocationContext::new(&self.config, queue.clone(), self.output.clone());

        log_invocation_operation(
            "dispatch",
            &self.config.request_id,
            reference,
            "started",
            None,
        );
        let dispatch = Dispatcher::new(&self.registry).dispatch(reference, payload, &context);

        let (exit_code, dropped_tasks) = match queue.run() {
            QueueExit::Terminated { code, dropped } => (code, dropped),
            QueueExit::Uncaught { error } => {
                debug!(error = %error, "Uncaught error in deferred work");
                self.output.diagnostic_line(&error.diagnostic_line());
                if !context.is_concluded() {
                    self.output
                        .diagnostic_line(messages::EXITED_BEFORE_COMPLETION);
                }
                (exit_codes::FAILURE, 0)
            }
            QueueExit::Drained => {
                debug!("Handler never concluded the invocation");
                self.output
                    .diagnostic_line(messages::EXITED_BEFORE_COMPLETION);
                (exit_codes::FAILURE, 0)
            }
        };

        let report = InvocationReport {
            exit_code,
            outcome: context.outcome(),
            dispatch,
            dropped_tasks,
        };

        log_invocation_operation(
            "conclude",
            &self.config.request_id,
            reference,
            if report.succeeded() { "succeeded" } else { "failed" },
            Some(&format!("exit_code={exit_code} dropped_tasks={dropped_tasks}")),
        );

        report
    }
}
