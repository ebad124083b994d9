//! # Handler Registry
//!
//! Explicit lookup table from `<module>.<entry>` references to callables,
//! populated by the host before the invocation starts.
//!
//! ## Architecture
//!
//! ```text
//! "index.handler" -> HandlerReference { module: "index", entry: "handler" }
//!                 -> HandlerModule "index" -> Export "handler" -> Handler
//! ```
//!
//! A module may also export plain values; resolving one of those as a
//! handler fails with a `TypeError`, the same as calling a non-function.
//!
//! ## Usage
//!
//! ```rust
//! use lambda_bootstrap::registry::{HandlerReference, HandlerRegistry};
//!
//! let mut registry = HandlerRegistry::new();
//! registry
//!     .register_handler("index.handler", |_payload, ctx| {
//!         ctx.succeed("hello");
//!         Ok(())
//!     })
//!     .unwrap();
//!
//! let reference: HandlerReference = "index.handler".parse().unwrap();
//! assert!(registry.resolve(&reference).is_ok());
//! ```

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde_json::Value;

use crate::context::InvocationContext;
use crate::error::{DispatchError, HandlerError};
use crate::logging::log_registry_operation;

/// A resolved handler: called once with the payload and the context
pub type Handler =
    Arc<dyn Fn(Value, InvocationContext) -> Result<(), HandlerError> + Send + Sync + 'static>;

/// Parsed `<module>.<entry>` reference
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HandlerReference {
    pub module: String,
    pub entry: String,
}

impl HandlerReference {
    pub fn new(module: impl Into<String>, entry: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            entry: entry.into(),
        }
    }
}

impl FromStr for HandlerReference {
    type Err = DispatchError;

    /// Segments past the second are ignored: `a.b.c` names entry `b` of module `a`
    fn from_str(reference: &str) -> Result<Self, Self::Err> {
        let mut parts = reference.split('.');
        let module = parts.next().unwrap_or_default();
        let entry = parts.next().unwrap_or_default();

        if module.is_empty() || entry.is_empty() {
            return Err(DispatchError::MalformedReference {
                reference: reference.to_string(),
            });
        }

        Ok(Self::new(module, entry))
    }
}

impl fmt::Display for HandlerReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.module, self.entry)
    }
}

/// A named member of a handler module
#[derive(Clone)]
pub enum Export {
    Function(Handler),
    Value(Value),
}

impl Export {
    /// Type name used in "is not a function" diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Function(_) => "function",
            Self::Value(Value::String(_)) => "string",
            Self::Value(Value::Number(_)) => "number",
            Self::Value(Value::Bool(_)) => "boolean",
            Self::Value(_) => "object",
        }
    }
}

impl fmt::Debug for Export {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Function(_) => f.write_str("Function(..)"),
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
        }
    }
}

/// Named exports of one module
#[derive(Debug, Clone, Default)]
pub struct HandlerModule {
    exports: HashMap<String, Export>,
}

impl HandlerModule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_handler<F>(mut self, entry: impl Into<String>, handler: F) -> Self
    where
        F: Fn(Value, InvocationContext) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        self.exports
            .insert(entry.into(), Export::Function(Arc::new(handler)));
        self
    }

    pub fn with_value(mut self, entry: impl Into<String>, value: Value) -> Self {
        self.exports.insert(entry.into(), Export::Value(value));
        self
    }

    pub fn get(&self, entry: &str) -> Option<&Export> {
        self.exports.get(entry)
    }

    pub fn len(&self) -> usize {
        self.exports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exports.is_empty()
    }
}

/// Registry statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryStats {
    pub total_modules: usize,
    pub total_exports: usize,
    pub modules: Vec<String>,
}

/// Lookup table consulted by the dispatcher
#[derive(Debug, Clone, Default)]
pub struct HandlerRegistry {
    modules: HashMap<String, HandlerModule>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a whole module, replacing any module of the same name
    pub fn register_module(&mut self, name: impl Into<String>, module: HandlerModule) {
        let name = name.into();
        log_registry_operation(
            "register_module",
            Some(&name),
            None,
            "registered",
            Some(&format!("{} exports", module.len())),
        );
        self.modules.insert(name, module);
    }

    /// Register a single handler under a `<module>.<entry>` reference
    pub fn register_handler<F>(&mut self, reference: &str, handler: F) -> Result<(), DispatchError>
    where
        F: Fn(Value, InvocationContext) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        let HandlerReference { module, entry } = reference.parse()?;
        log_registry_operation(
            "register_handler",
            Some(&module),
            Some(&entry),
            "registered",
            None,
        );

        let slot = self.modules.entry(module).or_default();
        slot.exports.insert(entry, Export::Function(Arc::new(handler)));
        Ok(())
    }

    /// Resolve a reference to a callable handler
    pub fn resolve(&self, reference: &HandlerReference) -> Result<Handler, DispatchError> {
        let module =
            self.modules
                .get(&reference.module)
                .ok_or_else(|| DispatchError::ModuleNotFound {
                    module: reference.module.clone(),
                })?;

        match module.get(&reference.entry) {
            None => Err(DispatchError::EntryMissing {
                module: reference.module.clone(),
                entry: reference.entry.clone(),
            }),
            Some(Export::Function(handler)) => Ok(handler.clone()),
            Some(other) => Err(DispatchError::NotCallable {
                kind: other.kind().to_string(),
            }),
        }
    }

    pub fn stats(&self) -> RegistryStats {
        let mut modules: Vec<String> = self.modules.keys().cloned().collect();
        modules.sort();

        RegistryStats {
            total_modules: self.modules.len(),
            total_exports: self.modules.values().map(HandlerModule::len).sum(),
            modules,
        }
    }
}
