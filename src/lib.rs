#![allow(clippy::doc_markdown)] // Allow technical terms in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Lambda Bootstrap
//!
//! Local emulation of a function-as-a-service invocation runtime.
//!
//! ## Overview
//!
//! One process runs exactly one invocation: a handler, resolved from a
//! `<module>.<entry>` reference, is called with an event payload and an
//! invocation context. The context's completion methods (`succeed`, `fail`,
//! `done`) decide the process's exit code and log output, exactly once, no
//! matter how often or how late the handler calls them.
//!
//! ## Architecture
//!
//! ```text
//! Bootstrap
//! ├── RuntimeConfig        (environment snapshot, timeout, memory limit)
//! ├── InvocationContext    (completion state machine, remaining time, metadata)
//! ├── Dispatcher           (reference -> HandlerRegistry -> handler call)
//! └── TurnQueue            (deferred work; ProcessTerminator queues the exit)
//! ```
//!
//! Exiting is always deferred by one turn: work the handler deferred before
//! concluding still runs, work deferred after concluding does not.
//!
//! ## Module Organization
//!
//! - [`config`] - Environment snapshot and configuration derivation
//! - [`context`] - The invocation context handed to handlers
//! - [`dispatch`] - Handler resolution and invocation
//! - [`execution`] - Turn queue and process terminator
//! - [`registry`] - Handler registry
//! - [`state_machine`] - Invocation states, events and outcomes
//! - [`output`] - Log and diagnostic streams
//! - [`logging`] - Runtime tracing setup
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use lambda_bootstrap::{Bootstrap, HandlerRegistry, RuntimeConfig};
//! use lambda_bootstrap::output::CapturedOutput;
//!
//! let mut registry = HandlerRegistry::new();
//! registry
//!     .register_handler("index.handler", |_event, ctx| {
//!         ctx.log("before");
//!         let later = ctx.clone();
//!         ctx.defer(move || {
//!             later.fail("late");
//!             Ok(())
//!         });
//!         Ok(())
//!     })
//!     .unwrap();
//!
//! let output = CapturedOutput::new();
//! let report = Bootstrap::new(RuntimeConfig::default(), registry)
//!     .with_output(Arc::new(output.clone()))
//!     .run_with_payload(Some("index.handler"), serde_json::json!({}));
//!
//! assert_eq!(report.exit_code, 1);
//! assert_eq!(output.log_lines(), vec!["before", r#"{"errorMessage":"late"}"#]);
//! ```

pub mod config;
pub mod constants;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod execution;
pub mod logging;
pub mod output;
pub mod payload;
pub mod registry;
pub mod runtime;
pub mod state_machine;

pub use config::{EnvironmentSnapshot, RuntimeConfig};
pub use context::{ContextMetadata, ContextSurface, InvocationContext};
pub use dispatch::{DispatchOutcome, Dispatcher};
pub use error::{BootstrapError, DispatchError, HandlerError, PayloadError, Result};
pub use execution::{ProcessTerminator, QueueExit, TurnQueue};
pub use registry::{HandlerModule, HandlerReference, HandlerRegistry};
pub use runtime::{Bootstrap, InvocationReport};
pub use state_machine::{InvocationState, Outcome};
