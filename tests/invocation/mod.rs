//! End-to-end invocation scenarios: dispatch, completion and exit scheduling

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use lambda_bootstrap::constants::messages;
use lambda_bootstrap::{
    DispatchError, DispatchOutcome, HandlerError, HandlerModule, HandlerRegistry, Outcome,
    RuntimeConfig,
};
use serde_json::json;

use crate::common::{bootstrap_for, bootstrap_with, REFERENCE};

#[test]
fn test_synchronous_success_exits_zero() {
    let (bootstrap, output) = bootstrap_with(|_, ctx| {
        ctx.succeed(json!({"ok": true}));
        Ok(())
    });

    let report = bootstrap.run_with_payload(Some(REFERENCE), json!({}));

    assert_eq!(report.exit_code, 0);
    assert_eq!(
        report.outcome,
        Some(Outcome::Success {
            result: r#"{"ok":true}"#.to_string()
        })
    );
    assert!(output.lines().is_empty());
}

#[test]
fn test_handler_receives_payload() {
    let (bootstrap, _) = bootstrap_with(|event, ctx| {
        let name = event["name"].as_str().unwrap_or("nobody").to_string();
        ctx.succeed(format!("hello {name}"));
        Ok(())
    });

    let report = bootstrap.run_with_payload(Some(REFERENCE), json!({"name": "world"}));

    assert_eq!(
        report.outcome,
        Some(Outcome::Success {
            result: r#""hello world""#.to_string()
        })
    );
}

#[test]
fn test_raised_error_exits_one() {
    let (bootstrap, output) = bootstrap_with(|_, _| Err(HandlerError::from("boom")));

    let report = bootstrap.run_with_payload(Some(REFERENCE), json!({}));

    assert_eq!(report.exit_code, 1);
    assert_eq!(output.diagnostic_lines(), vec!["boom"]);
    assert!(output.log_lines().is_empty());
    assert_eq!(
        report.dispatch,
        DispatchOutcome::Raised(HandlerError::message("boom"))
    );
    assert!(report.outcome.is_none());
}

#[test]
fn test_raised_error_object_reports_message() {
    let (bootstrap, output) = bootstrap_with(|_, _| {
        Err(HandlerError::object("Error: bad input").with_stack("Error: bad input\n    at handler"))
    });

    let report = bootstrap.run_with_payload(Some(REFERENCE), json!({}));

    assert_eq!(report.exit_code, 1);
    assert_eq!(output.diagnostic_lines(), vec!["Error: bad input"]);
    match report.dispatch {
        DispatchOutcome::Raised(error) => {
            assert_eq!(error.stack(), Some("Error: bad input\n    at handler"));
        }
        other => panic!("expected a raised error, got {other:?}"),
    }
}

#[test]
fn test_log_then_deferred_fail() {
    let (bootstrap, output) = bootstrap_with(|_, ctx| {
        ctx.log("before");
        let later = ctx.clone();
        ctx.defer(move || {
            later.fail("late");
            Ok(())
        });
        Ok(())
    });

    let report = bootstrap.run_with_payload(Some(REFERENCE), json!({}));

    assert_eq!(report.exit_code, 1);
    assert_eq!(
        output.log_lines(),
        vec!["before".to_string(), r#"{"errorMessage":"late"}"#.to_string()]
    );
    assert_eq!(
        report.outcome,
        Some(Outcome::Failure {
            error_message: Some("late".to_string())
        })
    );
}

#[test]
fn test_unknown_module_and_entry_never_start() {
    let mut registry = HandlerRegistry::new();
    registry.register_module(
        "index",
        HandlerModule::new().with_handler("handler", |_, ctx| {
            ctx.succeed(());
            Ok(())
        }),
    );
    let (bootstrap, output) = bootstrap_for(registry, RuntimeConfig::default());

    let report = bootstrap.run_with_payload(Some("nowhere.handler"), json!({}));
    assert_eq!(report.exit_code, 1);
    assert!(!report.dispatch.handler_started());
    assert_eq!(
        output.diagnostic_lines(),
        vec![
            "Cannot find module 'nowhere'".to_string(),
            messages::EXITED_BEFORE_COMPLETION.to_string()
        ]
    );

    let report = bootstrap.run_with_payload(Some("index.other"), json!({}));
    assert_eq!(report.exit_code, 1);
    assert!(matches!(report.dispatch, DispatchOutcome::NotStarted(_)));
}

#[test]
fn test_missing_reference() {
    let (bootstrap, output) = bootstrap_with(|_, ctx| {
        ctx.succeed(());
        Ok(())
    });

    let report = bootstrap.run_with_payload(None, json!({}));

    assert_eq!(report.exit_code, 1);
    assert_eq!(
        output.diagnostic_lines()[0],
        DispatchError::MissingReference.to_string()
    );
}

#[test]
fn test_work_deferred_before_conclusion_runs() {
    let ran = Arc::new(AtomicUsize::new(0));
    let counter = ran.clone();

    let (bootstrap, output) = bootstrap_with(move |_, ctx| {
        let first = counter.clone();
        ctx.defer(move || {
            first.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        let logger = ctx.clone();
        ctx.defer(move || {
            logger.log("deferred before");
            Ok(())
        });

        ctx.succeed("done");

        let after = counter.clone();
        ctx.defer(move || {
            after.fetch_add(100, Ordering::SeqCst);
            Ok(())
        });
        Ok(())
    });

    let report = bootstrap.run_with_payload(Some(REFERENCE), json!({}));

    assert_eq!(report.exit_code, 0);
    assert_eq!(ran.load(Ordering::SeqCst), 1);
    assert_eq!(report.dropped_tasks, 1);
    assert_eq!(output.log_lines(), vec!["deferred before"]);
}

#[test]
fn test_deferred_succeed_concludes() {
    let (bootstrap, output) = bootstrap_with(|event, ctx| {
        let later = ctx.clone();
        ctx.defer(move || {
            later.done(Ok::<_, String>(event));
            Ok(())
        });
        Ok(())
    });

    let report = bootstrap.run_with_payload(Some(REFERENCE), json!([1, 2, 3]));

    assert!(report.succeeded());
    assert_eq!(
        report.outcome,
        Some(Outcome::Success {
            result: "[1,2,3]".to_string()
        })
    );
    assert!(output.lines().is_empty());
}

#[test]
fn test_fail_then_succeed_keeps_failure() {
    let (bootstrap, output) = bootstrap_with(|_, ctx| {
        ctx.fail("first");
        ctx.succeed("second");
        Ok(())
    });

    let report = bootstrap.run_with_payload(Some(REFERENCE), json!({}));

    assert_eq!(report.exit_code, 1);
    assert_eq!(output.log_lines(), vec![r#"{"errorMessage":"first"}"#]);
}

#[test]
fn test_succeed_then_fail_logs_but_exits_zero() {
    let (bootstrap, output) = bootstrap_with(|_, ctx| {
        ctx.succeed(1);
        ctx.fail("too late");
        Ok(())
    });

    let report = bootstrap.run_with_payload(Some(REFERENCE), json!({}));

    assert_eq!(report.exit_code, 0);
    assert_eq!(
        report.outcome,
        Some(Outcome::Success {
            result: "1".to_string()
        })
    );
    assert_eq!(output.log_lines(), vec![r#"{"errorMessage":"too late"}"#]);
}

#[test]
fn test_panicking_handler_is_reported() {
    let (bootstrap, output) = bootstrap_with(|_, _| panic!("handler exploded"));

    let report = bootstrap.run_with_payload(Some(REFERENCE), json!({}));

    assert_eq!(report.exit_code, 1);
    assert_eq!(output.diagnostic_lines(), vec!["handler exploded"]);
}
