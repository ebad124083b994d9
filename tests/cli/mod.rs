//! The `bootstrap` binary: exit codes and exact stream contents

use std::process::{Command, Output};

use lambda_bootstrap::constants::{env, messages};

fn bootstrap() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_bootstrap"));
    command
        .env_remove(env::LOG_FILTER)
        .env_remove(env::LOG_FORMAT)
        .env_remove(env::ENVIRONMENT)
        .env_remove(env::PAYLOAD_FILE);
    command
}

fn lines(bytes: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(bytes)
        .lines()
        .map(str::to_string)
        .collect()
}

fn run(command: &mut Command) -> Output {
    command.output().expect("bootstrap binary runs")
}

#[test]
fn test_unknown_module_writes_exactly_two_diagnostic_lines() {
    let output = run(bootstrap().arg("nope.handler"));

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        lines(&output.stderr),
        vec![
            "Cannot find module 'nope'".to_string(),
            messages::EXITED_BEFORE_COMPLETION.to_string()
        ]
    );
    assert!(output.stdout.is_empty());
}

#[test]
fn test_echo_success_is_silent() {
    let output = run(bootstrap().arg("echo.handler"));

    assert_eq!(output.status.code(), Some(0));
    assert!(output.stderr.is_empty(), "stderr: {:?}", lines(&output.stderr));
    assert!(output.stdout.is_empty());
}

#[cfg(unix)]
#[test]
fn test_non_utf8_environment_falls_back_to_defaults() {
    use std::ffi::OsString;
    use std::os::unix::ffi::OsStringExt;

    let output = run(bootstrap()
        .arg("context.inspect")
        .env("JUNK", OsString::from_vec(vec![0xff, 0xfe]))
        .env(env::TASK_MAXRAM, OsString::from_vec(vec![0xff]))
        .env(env::FUNCTION_NAME, "inspector"));

    assert_eq!(output.status.code(), Some(0));
    assert!(output.stderr.is_empty(), "stderr: {:?}", lines(&output.stderr));

    let stdout = lines(&output.stdout);
    let metadata: serde_json::Value =
        serde_json::from_str(&stdout[0]).expect("first line is the metadata record");
    assert_eq!(metadata["memoryLimitInMB"], "300");
    assert_eq!(metadata["functionName"], "inspector");
}
