use super::states::Outcome;
use serde::{Deserialize, Serialize};

/// Events that conclude an invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum CompletionEvent {
    /// Conclude successfully with the serialized result
    Succeed(String),
    /// Conclude with a failure and its normalized message
    Fail(Option<String>),
}

impl CompletionEvent {
    /// Get a string representation of the event type for logging
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Succeed(_) => "succeed",
            Self::Fail(_) => "fail",
        }
    }

    /// Extract error message if this is a failure event
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Fail(msg) => msg.as_deref(),
            Self::Succeed(_) => None,
        }
    }

    /// The outcome recorded if this event concludes the invocation
    pub fn into_outcome(self) -> Outcome {
        match self {
            Self::Succeed(result) => Outcome::Success { result },
            Self::Fail(error_message) => Outcome::Failure { error_message },
        }
    }
}
