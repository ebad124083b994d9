//! # Handler Dispatcher
//!
//! Resolves a handler reference through the [`HandlerRegistry`] and calls the
//! handler once with the payload and the context. The dispatcher does not wait
//! for the handler to conclude; completion happens through the context,
//! possibly from deferred work.
//!
//! Failures are reported, never propagated: a diagnostic line is written and
//! the process exit is scheduled with the failure code.

use serde_json::Value;
use tracing::{debug, info_span};

use crate::constants::{exit_codes, messages};
use crate::context::InvocationContext;
use crate::error::{DispatchError, HandlerError};
use crate::execution::guard::run_guarded;
use crate::registry::{HandlerReference, HandlerRegistry};

/// How the synchronous part of a dispatch ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The handler ran and returned without raising
    Returned,
    /// The handler started and raised an error
    Raised(HandlerError),
    /// The handler was never started
    NotStarted(DispatchError),
}

impl DispatchOutcome {
    pub fn handler_started(&self) -> bool {
        !matches!(self, Self::NotStarted(_))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Dispatcher<'a> {
    registry: &'a HandlerRegistry,
}

impl<'a> Dispatcher<'a> {
    pub fn new(registry: &'a HandlerRegistry) -> Self {
        Self { registry }
    }

    /// Resolve `reference` and invoke the handler with `(payload, context)`
    pub fn dispatch(
        &self,
        reference: Option<&str>,
        payload: Value,
        context: &InvocationContext,
    ) -> DispatchOutcome {
        let span = info_span!(
            "dispatch",
            handler = reference.unwrap_or_default(),
            request_id = %context.aws_request_id()
        );
        let _entered = span.enter();

        let handler = match reference
            .ok_or(DispatchError::MissingReference)
            .and_then(str::parse::<HandlerReference>)
            .and_then(|parsed| self.registry.resolve(&parsed))
        {
            Ok(handler) => handler,
            Err(error) => {
                debug!(error = %error, "Handler could not be resolved");
                let output = context.output();
                output.diagnostic_line(&error.to_string());
                output.diagnostic_line(messages::EXITED_BEFORE_COMPLETION);
                context.terminator().schedule_exit(exit_codes::FAILURE);
                return DispatchOutcome::NotStarted(error);
            }
        };

        debug!("Invoking handler");
        let call_context = context.clone();
        match run_guarded(move || handler(payload, call_context)) {
            Ok(()) => DispatchOutcome::Returned,
            Err(error) => {
                debug!(error = %error, "Handler raised");
                context.output().diagnostic_line(&error.diagnostic_line());
                context.terminator().schedule_exit(exit_codes::FAILURE);
                DispatchOutcome::Raised(error)
            }
        }
    }
}
