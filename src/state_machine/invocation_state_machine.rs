use super::{
    errors::{StateMachineError, StateMachineResult},
    events::CompletionEvent,
    states::{InvocationState, Outcome},
};
use tracing::debug;

/// Completion state of a single invocation.
///
/// The state is derived from the recorded outcome, so `Concluded` always has
/// one. The first completion event wins; every later event is rejected with
/// [`StateMachineError::AlreadyConcluded`] and leaves the outcome untouched.
#[derive(Debug, Default)]
pub struct InvocationStateMachine {
    outcome: Option<Outcome>,
}

impl InvocationStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_state(&self) -> InvocationState {
        match self.outcome {
            Some(_) => InvocationState::Concluded,
            None => InvocationState::Pending,
        }
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    pub fn is_terminal(&self) -> bool {
        self.current_state().is_terminal()
    }

    /// Apply a completion event, returning the recorded outcome
    pub fn transition(&mut self, event: CompletionEvent) -> StateMachineResult<&Outcome> {
        let target_state = self.determine_target_state(&event)?;
        debug!(
            from = %self.current_state(),
            to = %target_state,
            event = event.event_type(),
            "Invocation state transition"
        );

        Ok(&*self.outcome.insert(event.into_outcome()))
    }

    /// Determine the target state based on the recorded outcome and event
    fn determine_target_state(&self, event: &CompletionEvent) -> StateMachineResult<InvocationState> {
        match (&self.outcome, event) {
            (None, CompletionEvent::Succeed(_)) | (None, CompletionEvent::Fail(_)) => {
                Ok(InvocationState::Concluded)
            }

            (Some(outcome), _) => Err(StateMachineError::AlreadyConcluded {
                outcome: outcome_label(outcome).to_string(),
            }),
        }
    }
}

fn outcome_label(outcome: &Outcome) -> &'static str {
    match outcome {
        Outcome::Success { .. } => "success",
        Outcome::Failure { .. } => "failure",
    }
}
