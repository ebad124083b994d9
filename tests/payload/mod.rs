//! Payload file handling through the full bootstrap

use std::io::Write;

use lambda_bootstrap::{HandlerRegistry, Outcome, RuntimeConfig};
use tempfile::NamedTempFile;

use crate::common::{bootstrap_for, REFERENCE};

fn echo_registry() -> HandlerRegistry {
    let mut registry = HandlerRegistry::new();
    registry
        .register_handler(REFERENCE, |event, ctx| {
            ctx.succeed(event);
            Ok(())
        })
        .expect("reference is well formed");
    registry
}

fn config_for(file: &NamedTempFile) -> RuntimeConfig {
    RuntimeConfig {
        payload_file: Some(file.path().to_path_buf()),
        ..RuntimeConfig::default()
    }
}

#[test]
fn test_payload_file_is_passed_to_handler() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, r#"{{"bucket": "photos", "key": "cat.png"}}"#).unwrap();

    let (bootstrap, output) = bootstrap_for(echo_registry(), config_for(&file));
    let report = bootstrap.run(Some(REFERENCE));

    assert_eq!(report.exit_code, 0);
    assert_eq!(
        report.outcome,
        Some(Outcome::Success {
            result: r#"{"bucket":"photos","key":"cat.png"}"#.to_string()
        })
    );
    assert!(output.lines().is_empty());
}

#[test]
fn test_no_payload_file_means_empty_object() {
    let (bootstrap, _) = bootstrap_for(echo_registry(), RuntimeConfig::default());

    let report = bootstrap.run(Some(REFERENCE));

    assert_eq!(
        report.outcome,
        Some(Outcome::Success {
            result: "{}".to_string()
        })
    );
}

#[test]
fn test_malformed_payload_is_reported_and_replaced() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{{ not json").unwrap();

    let (bootstrap, output) = bootstrap_for(echo_registry(), config_for(&file));
    let report = bootstrap.run(Some(REFERENCE));

    assert_eq!(report.exit_code, 0);
    assert_eq!(
        report.outcome,
        Some(Outcome::Success {
            result: "{}".to_string()
        })
    );
    let diagnostics = output.diagnostic_lines();
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].starts_with("bootstrap: Error reading payload file"));
}
