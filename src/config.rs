//! # Runtime Configuration
//!
//! The environment is read exactly once at startup into an
//! [`EnvironmentSnapshot`]; [`RuntimeConfig`] is derived from it. Derivation
//! never fails: every unparsable or missing value falls back to a documented
//! default.

use crate::constants::{defaults, env};
use crate::error::Result;
use std::collections::HashMap;
use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

/// Immutable view of the environment captured when the process starts
#[derive(Debug, Clone)]
pub struct EnvironmentSnapshot {
    settings: config::Config,
}

impl EnvironmentSnapshot {
    /// Capture the runtime's variables from the process environment
    pub fn from_process() -> Result<Self> {
        Self::from_lookup(|name| std::env::var_os(name))
    }

    /// Capture the runtime's variables through `lookup`.
    ///
    /// Only the names in [`env::RUNTIME_VARS`] are read. A value that is not
    /// valid UTF-8 is treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let mut vars = HashMap::new();
        for name in env::RUNTIME_VARS {
            let Some(raw) = lookup(name) else {
                continue;
            };
            match raw.into_string() {
                Ok(value) => {
                    vars.insert(name.to_string(), value);
                }
                Err(_) => debug!(variable = name, "Ignoring value that is not valid UTF-8"),
            }
        }
        Self::from_map(vars)
    }

    /// Build a snapshot from explicit variables instead of the process environment
    pub fn from_map(vars: HashMap<String, String>) -> Result<Self> {
        Self::collect(config::Environment::default().source(Some(vars)))
    }

    fn collect(source: config::Environment) -> Result<Self> {
        let settings = config::Config::builder().add_source(source).build()?;
        Ok(Self { settings })
    }

    /// Look up a variable by its environment name.
    ///
    /// The environment source folds keys to lowercase.
    pub fn get(&self, name: &str) -> Option<String> {
        self.settings.get_string(&name.to_lowercase()).ok()
    }
}

/// Configuration feeding the invocation context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Invocation timeout; the context deadline is `start + timeout`
    pub timeout: Duration,
    /// Memory limit in bytes, as derived from the scaled size string
    pub memory_limit_bytes: u64,
    pub function_name: String,
    pub request_id: String,
    /// Optional path of the JSON event payload
    pub payload_file: Option<PathBuf>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(defaults::TIMEOUT_SECONDS),
            memory_limit_bytes: defaults::MEMORY_LIMIT_BYTES,
            function_name: String::new(),
            request_id: generate_request_id(),
            payload_file: None,
        }
    }
}

impl RuntimeConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self> {
        let snapshot = EnvironmentSnapshot::from_process()?;
        Ok(Self::from_snapshot(&snapshot))
    }

    pub fn from_snapshot(snapshot: &EnvironmentSnapshot) -> Self {
        let timeout_raw = snapshot.get(env::TASK_TIMEOUT);
        let memory_raw = snapshot.get(env::TASK_MAXRAM);

        let config = Self {
            timeout: Duration::from_secs(parse_timeout_seconds(timeout_raw.as_deref())),
            memory_limit_bytes: parse_memory_limit(memory_raw.as_deref()),
            function_name: snapshot.get(env::FUNCTION_NAME).unwrap_or_default(),
            request_id: snapshot
                .get(env::TASK_ID)
                .filter(|id| !id.is_empty())
                .unwrap_or_else(generate_request_id),
            payload_file: snapshot
                .get(env::PAYLOAD_FILE)
                .filter(|path| !path.is_empty())
                .map(PathBuf::from),
        };

        debug!(
            timeout_secs = config.timeout.as_secs(),
            memory_limit_bytes = config.memory_limit_bytes,
            function_name = %config.function_name,
            request_id = %config.request_id,
            "Derived runtime configuration"
        );

        config
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_memory_limit_bytes(mut self, bytes: u64) -> Self {
        self.memory_limit_bytes = bytes;
        self
    }

    pub fn with_function_name(mut self, name: impl Into<String>) -> Self {
        self.function_name = name.into();
        self
    }

    pub fn with_request_id(mut self, id: impl Into<String>) -> Self {
        self.request_id = id.into();
        self
    }

    /// Whole megabytes rendered as decimal text
    pub fn memory_limit_in_mb(&self) -> String {
        (self.memory_limit_bytes / 1024 / 1024).to_string()
    }
}

fn generate_request_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Integer seconds; anything else yields the default timeout
pub fn parse_timeout_seconds(raw: Option<&str>) -> u64 {
    raw.and_then(|value| value.trim().parse::<u64>().ok())
        .unwrap_or(defaults::TIMEOUT_SECONDS)
}

/// Parse a scaled size string into bytes.
///
/// `<n>b`, `<n>k`, `<n>m` and `<n>g` (any case) scale by powers of 1024; a bare
/// number is raw bytes. Everything else yields the 300 MiB default.
pub fn parse_memory_limit(raw: Option<&str>) -> u64 {
    raw.and_then(|value| parse_size(value.trim()))
        .unwrap_or(defaults::MEMORY_LIMIT_BYTES)
}

fn parse_size(raw: &str) -> Option<u64> {
    let unit = raw.chars().last()?;
    if unit.is_ascii_digit() {
        return raw.parse().ok();
    }

    let scale: u64 = match unit.to_ascii_lowercase() {
        'b' => 1,
        'k' => 1024,
        'm' => 1024 * 1024,
        'g' => 1024 * 1024 * 1024,
        _ => return None,
    };

    let number: u64 = raw[..raw.len() - unit.len_utf8()].parse().ok()?;
    number.checked_mul(scale)
}
