//! Configuration derivation from environment snapshots

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use lambda_bootstrap::config::{parse_memory_limit, parse_timeout_seconds};
use lambda_bootstrap::{EnvironmentSnapshot, RuntimeConfig};
use proptest::prelude::*;

use crate::common::strategies::scale_strategy;

const DEFAULT_MEMORY: u64 = 300 * 1024 * 1024;

fn snapshot(vars: &[(&str, &str)]) -> EnvironmentSnapshot {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
    EnvironmentSnapshot::from_map(map).expect("snapshot builds")
}

proptest! {
    /// Property: `<n><scale>` is n times the scale's power of 1024
    #[test]
    fn scaled_sizes_multiply(n in 0u64..1_000_000, (suffix, scale) in scale_strategy()) {
        prop_assert_eq!(parse_memory_limit(Some(&format!("{n}{suffix}"))), n * scale);
    }

    /// Property: a bare number is taken as bytes
    #[test]
    fn bare_numbers_are_bytes(n in any::<u64>()) {
        prop_assert_eq!(parse_memory_limit(Some(&n.to_string())), n);
    }

    /// Property: purely alphabetic strings fall back to the default
    #[test]
    fn alphabetic_strings_use_default(raw in "[a-zA-Z]{0,12}") {
        prop_assert_eq!(parse_memory_limit(Some(&raw)), DEFAULT_MEMORY);
    }
}

#[test]
fn test_full_environment() {
    let env = snapshot(&[
        ("TASK_TIMEOUT", "15"),
        ("TASK_MAXRAM", "128m"),
        ("AWS_LAMBDA_FUNCTION_NAME", "thumbnailer"),
        ("TASK_ID", "req-42"),
        ("PAYLOAD_FILE", "/tmp/event.json"),
    ]);

    let config = RuntimeConfig::from_snapshot(&env);

    assert_eq!(config.timeout, Duration::from_secs(15));
    assert_eq!(config.memory_limit_bytes, 134_217_728);
    assert_eq!(config.memory_limit_in_mb(), "128");
    assert_eq!(config.function_name, "thumbnailer");
    assert_eq!(config.request_id, "req-42");
    assert_eq!(config.payload_file, Some(PathBuf::from("/tmp/event.json")));
}

#[test]
fn test_empty_environment_uses_defaults() {
    let config = RuntimeConfig::from_snapshot(&snapshot(&[]));

    assert_eq!(config.timeout, Duration::from_secs(3600));
    assert_eq!(config.memory_limit_bytes, DEFAULT_MEMORY);
    assert_eq!(config.memory_limit_in_mb(), "300");
    assert_eq!(config.function_name, "");
    assert!(!config.request_id.is_empty());
    assert!(config.payload_file.is_none());
}

#[test]
fn test_unparsable_values_use_defaults() {
    let config = RuntimeConfig::from_snapshot(&snapshot(&[
        ("TASK_TIMEOUT", "soon"),
        ("TASK_MAXRAM", "lots"),
    ]));

    assert_eq!(config.timeout, Duration::from_secs(3600));
    assert_eq!(config.memory_limit_bytes, DEFAULT_MEMORY);
}

#[test]
fn test_timeout_parsing() {
    assert_eq!(parse_timeout_seconds(Some("1")), 1);
    assert_eq!(parse_timeout_seconds(Some(" 90 ")), 90);
    assert_eq!(parse_timeout_seconds(Some("-1")), 3600);
    assert_eq!(parse_timeout_seconds(Some("1.5")), 3600);
    assert_eq!(parse_timeout_seconds(None), 3600);
}

#[test]
fn test_generated_request_ids_differ() {
    let first = RuntimeConfig::default();
    let second = RuntimeConfig::default();

    assert_ne!(first.request_id, second.request_id);
}
