// State machine module for invocation completion
//
// An invocation starts Pending and is Concluded by the first completion
// event. The recorded outcome decides the exit code.

pub mod errors;
pub mod events;
pub mod invocation_state_machine;
pub mod states;

// Re-export main types for convenient access
pub use errors::{StateMachineError, StateMachineResult};
pub use events::CompletionEvent;
pub use invocation_state_machine::InvocationStateMachine;
pub use states::{InvocationState, Outcome};
