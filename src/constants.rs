//! # Runtime Constants
//!
//! Environment variable names, defaults and fixed literals that define the
//! emulated invocation contract.

/// Environment variables read once at startup
pub mod env {
    pub const TASK_TIMEOUT: &str = "TASK_TIMEOUT";
    pub const TASK_MAXRAM: &str = "TASK_MAXRAM";
    pub const FUNCTION_NAME: &str = "AWS_LAMBDA_FUNCTION_NAME";
    pub const TASK_ID: &str = "TASK_ID";
    pub const PAYLOAD_FILE: &str = "PAYLOAD_FILE";

    /// Variables captured into the environment snapshot
    pub const RUNTIME_VARS: [&str; 5] =
        [TASK_TIMEOUT, TASK_MAXRAM, FUNCTION_NAME, TASK_ID, PAYLOAD_FILE];

    // Runtime tracing
    pub const LOG_FILTER: &str = "LAMBDA_BOOTSTRAP_LOG";
    pub const LOG_FORMAT: &str = "LAMBDA_BOOTSTRAP_LOG_FORMAT";
    pub const ENVIRONMENT: &str = "LAMBDA_BOOTSTRAP_ENV";
}

/// Defaults substituted when configuration is missing or unparsable
pub mod defaults {
    pub const TIMEOUT_SECONDS: u64 = 3600;
    pub const MEMORY_LIMIT_BYTES: u64 = 300 * 1024 * 1024;
}

/// Version reported for every invocation
pub const FUNCTION_VERSION: &str = "$LATEST";

/// Fixed diagnostic and log texts
pub mod messages {
    pub const EXITED_BEFORE_COMPLETION: &str = "Process exited before completing request";
    pub const PAYLOAD_READ_ERROR: &str = "bootstrap: Error reading payload file";
    pub const UNSERIALIZABLE_RESULT: &str = "Unable to stringify body as json";
    pub const UNRENDERABLE_ERROR: &str =
        "fail() called with argument but a problem was encountered while converting it to a to string";
}

/// Process exit codes
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const FAILURE: i32 = 1;
}
