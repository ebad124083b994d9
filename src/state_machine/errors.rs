use thiserror::Error;

/// Errors from invocation state transitions
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateMachineError {
    #[error("Invocation already concluded with {outcome}")]
    AlreadyConcluded { outcome: String },
}

pub type StateMachineResult<T> = Result<T, StateMachineError>;
