//! Introspection descriptor for the completion methods exposed to handlers

use serde::Serialize;

/// A method on the context surface and how many arguments it requires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodSignature {
    pub name: &'static str,
    pub required_args: usize,
}

/// `done` takes an optional error and an optional result, so it reports zero
pub const CONTEXT_METHODS: [MethodSignature; 4] = [
    MethodSignature {
        name: "succeed",
        required_args: 1,
    },
    MethodSignature {
        name: "fail",
        required_args: 1,
    },
    MethodSignature {
        name: "done",
        required_args: 0,
    },
    MethodSignature {
        name: "getRemainingTimeInMillis",
        required_args: 0,
    },
];

pub struct ContextSurface;

impl ContextSurface {
    pub fn methods() -> &'static [MethodSignature] {
        &CONTEXT_METHODS
    }

    pub fn required_args(method: &str) -> Option<usize> {
        CONTEXT_METHODS
            .iter()
            .find(|signature| signature.name == method)
            .map(|signature| signature.required_args)
    }
}
