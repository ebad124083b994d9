//! # Registry Infrastructure
//!
//! Explicit handler resolution. The host registers handler modules up front;
//! the dispatcher only asks the registry to resolve a reference.
//!
//! ## Usage
//!
//! ```rust
//! use lambda_bootstrap::registry::{HandlerModule, HandlerRegistry};
//!
//! let mut registry = HandlerRegistry::new();
//! registry.register_module(
//!     "index",
//!     HandlerModule::new().with_handler("handler", |payload, ctx| {
//!         ctx.succeed(payload);
//!         Ok(())
//!     }),
//! );
//! assert_eq!(registry.stats().total_exports, 1);
//! ```

pub mod handler_registry;

// Re-export main types for easy access
pub use handler_registry::{
    Export, Handler, HandlerModule, HandlerReference, HandlerRegistry, RegistryStats,
};
