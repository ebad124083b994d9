//! # Context Metadata
//!
//! Immutable snapshot of the invocation's descriptive fields, built once when
//! the context is constructed.

use serde::Serialize;

use crate::config::RuntimeConfig;
use crate::constants::FUNCTION_VERSION;

/// Read-only metadata exposed to the handler
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextMetadata {
    /// Name of the function being invoked
    pub function_name: String,

    /// Always `$LATEST`
    pub function_version: String,

    /// Never populated locally
    pub invoked_function_arn: String,

    /// Whole megabytes as decimal text
    #[serde(rename = "memoryLimitInMB")]
    pub memory_limit_in_mb: String,

    /// Identifier of this invocation
    pub aws_request_id: String,

    pub log_group_name: String,
    pub log_stream_name: String,
    pub identity: Option<serde_json::Value>,
    pub client_context: Option<serde_json::Value>,
}

impl ContextMetadata {
    pub fn from_config(config: &RuntimeConfig) -> Self {
        Self {
            function_name: config.function_name.clone(),
            function_version: FUNCTION_VERSION.to_string(),
            invoked_function_arn: String::new(),
            memory_limit_in_mb: config.memory_limit_in_mb(),
            aws_request_id: config.request_id.clone(),
            log_group_name: String::new(),
            log_stream_name: String::new(),
            identity: None,
            client_context: None,
        }
    }
}
