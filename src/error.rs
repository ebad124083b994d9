//! # Error Types
//!
//! Structured errors for the bootstrap using thiserror. None of these cross
//! the process boundary as values: they surface only as log lines and the
//! exit code.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by a handler (synchronously or from a deferred action).
///
/// Handlers may raise either a bare message or an error object; the two
/// render differently in diagnostics.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HandlerError {
    /// A bare value raised as the error itself, rendered verbatim
    #[error("{0}")]
    Message(String),

    /// An error object, rendered through its message
    #[error("{message}")]
    Object {
        message: String,
        stack: Option<String>,
    },
}

impl HandlerError {
    pub fn message(text: impl Into<String>) -> Self {
        Self::Message(text.into())
    }

    pub fn object(message: impl Into<String>) -> Self {
        Self::Object {
            message: message.into(),
            stack: None,
        }
    }

    /// Attach a stack trace to an object error; bare messages carry none
    pub fn with_stack(self, trace: impl Into<String>) -> Self {
        match self {
            Self::Object { message, .. } => Self::Object {
                message,
                stack: Some(trace.into()),
            },
            other => other,
        }
    }

    pub fn stack(&self) -> Option<&str> {
        match self {
            Self::Object { stack, .. } => stack.as_deref(),
            Self::Message(_) => None,
        }
    }

    /// The single line written to the diagnostic stream for this error
    pub fn diagnostic_line(&self) -> String {
        self.to_string()
    }
}

impl From<&str> for HandlerError {
    fn from(text: &str) -> Self {
        Self::Message(text.to_string())
    }
}

impl From<String> for HandlerError {
    fn from(text: String) -> Self {
        Self::Message(text)
    }
}

/// Failures resolving a handler reference before the handler starts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("bootstrap: No script specified")]
    MissingReference,

    #[error("Bad handler '{reference}': expected format 'moduleName.functionName'")]
    MalformedReference { reference: String },

    #[error("Cannot find module '{module}'")]
    ModuleNotFound { module: String },

    #[error("Handler '{entry}' missing on module '{module}'")]
    EntryMissing { module: String, entry: String },

    #[error("TypeError: {kind} is not a function")]
    NotCallable { kind: String },
}

/// Failures loading the event payload from disk.
#[derive(Error, Debug)]
pub enum PayloadError {
    #[error("{path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Startup error; everything after startup is reported, not propagated
#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, BootstrapError>;
