//! # Bootstrap
//!
//! Process entry point: runs a single invocation of the handler named on the
//! command line and exits with the code the invocation concluded with.
//!
//! Configuration comes from the environment (`TASK_TIMEOUT`, `TASK_MAXRAM`,
//! `AWS_LAMBDA_FUNCTION_NAME`, `TASK_ID`, `PAYLOAD_FILE`).

use clap::Parser;
use lambda_bootstrap::logging::init_structured_logging;
use lambda_bootstrap::output::{OutputSink, StdStreams};
use lambda_bootstrap::{
    Bootstrap, ContextSurface, HandlerError, HandlerModule, HandlerRegistry, RuntimeConfig,
};
use tracing::debug;

#[derive(Parser)]
#[command(name = "bootstrap")]
#[command(about = "Run one function invocation locally")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Handler reference in the form <module>.<entry>
    handler: Option<String>,
}

fn main() {
    let cli = Cli::parse();
    init_structured_logging();

    // Handler panics surface as one diagnostic line from the dispatcher
    std::panic::set_hook(Box::new(|info| {
        debug!(panic = %info, "Panic contained");
    }));

    let code = match run(cli.handler.as_deref()) {
        Ok(code) => code,
        Err(e) => {
            debug!(error = %e, "Startup failed");
            StdStreams.diagnostic_line(&format!("bootstrap: {e:#}"));
            1
        }
    };

    std::process::exit(code);
}

fn run(handler: Option<&str>) -> anyhow::Result<i32> {
    let config = RuntimeConfig::from_env()?;
    let registry = builtin_handlers();
    debug!(modules = ?registry.stats().modules, "Handler registry ready");

    let report = Bootstrap::new(config, registry).run(handler);
    Ok(report.exit_code)
}

/// Smoke handlers so the bootstrap is runnable without an embedding host
fn builtin_handlers() -> HandlerRegistry {
    let mut registry = HandlerRegistry::new();

    registry.register_module(
        "echo",
        HandlerModule::new().with_handler("handler", |payload, ctx| {
            ctx.succeed(payload);
            Ok(())
        }),
    );

    registry.register_module(
        "context",
        HandlerModule::new().with_handler("inspect", |_, ctx| {
            let metadata = serde_json::to_string(ctx.metadata())
                .map_err(|e| HandlerError::object(e.to_string()))?;
            ctx.log(metadata);

            for method in ContextSurface::methods() {
                ctx.log(format!(
                    "context.{} takes {} required arguments",
                    method.name, method.required_args
                ));
            }
            ctx.log(format!(
                "remaining time {}ms",
                ctx.get_remaining_time_in_millis()
            ));

            ctx.done(Ok::<_, HandlerError>(()));
            Ok(())
        }),
    );

    registry
}
