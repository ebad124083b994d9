//! # Invocation Context
//!
//! Everything a handler receives besides its payload: completion methods,
//! the remaining-time clock, deferral and read-only metadata.

pub mod invocation_context;
pub mod metadata;
pub mod surface;

pub use invocation_context::InvocationContext;
pub use metadata::ContextMetadata;
pub use surface::{ContextSurface, MethodSignature};
