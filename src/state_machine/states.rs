use crate::constants::exit_codes;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Invocation state. `Pending` moves to `Concluded` exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvocationState {
    /// Handler has not concluded the invocation yet
    Pending,
    /// An outcome has been recorded
    Concluded,
}

impl InvocationState {
    /// Check if this is a terminal state (no further transitions allowed)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Concluded)
    }
}

impl fmt::Display for InvocationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Concluded => write!(f, "concluded"),
        }
    }
}

impl std::str::FromStr for InvocationState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "concluded" => Ok(Self::Concluded),
            _ => Err(format!("Invalid invocation state: {s}")),
        }
    }
}

impl Default for InvocationState {
    fn default() -> Self {
        Self::Pending
    }
}

/// Outcome fixed at the moment of conclusion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// Result serialized to its JSON text
    Success { result: String },
    /// Normalized error message; `None` when failing without an error value
    Failure { error_message: Option<String> },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Exit code the process ends with for this outcome
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Success { .. } => exit_codes::SUCCESS,
            Self::Failure { .. } => exit_codes::FAILURE,
        }
    }
}
