//! Single-invocation action runner
//!
//! A runner process reads its invocation from the environment, dispatches it
//! to one action of an app's registry and prints exactly one JSON line on
//! stdout. All diagnostics go to stderr through `tracing`.
//!
//! Exit status is 0 whenever a result line was printed, including failures.
//! The only fatal case is a missing `ACTION`, which prints nothing and exits
//! with 1.

use appkit_actions::{ActionContext, ActionRegistry};
use appkit_core::{ActionError, InvocationRequest, InvocationResult, LogLevel, RunnerConfig};
use appkit_infra::Datastore;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::process::ExitCode;
use std::time::Instant;
use tracing::Instrument;

/// What a run produced: the line to print, if any, and the exit status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub line: Option<String>,
    pub exit_code: u8,
}

impl RunOutcome {
    fn printed(result: &InvocationResult) -> Self {
        Self {
            line: Some(result.to_line()),
            exit_code: 0,
        }
    }

    fn fatal() -> Self {
        Self {
            line: None,
            exit_code: 1,
        }
    }
}

/// Run one invocation described by `config` against `registry`.
pub async fn run(registry: &ActionRegistry, config: &RunnerConfig) -> RunOutcome {
    let request = match config.invocation_request() {
        Ok(request) => request,
        Err(e) => {
            tracing::error!(error = %e, app = %registry.app().name, "Cannot start invocation");
            return RunOutcome::fatal();
        }
    };

    let context = ActionContext::new(
        registry.app().clone(),
        config.execution_id(),
        Datastore::from_config(config),
    );
    let result = dispatch(registry, &context, request).await;
    RunOutcome::printed(&result)
}

/// Look up and execute the requested action, turning every outcome into a
/// result record. Errors and panics raised by the action never escape.
pub async fn dispatch(
    registry: &ActionRegistry,
    context: &ActionContext,
    request: InvocationRequest,
) -> InvocationResult {
    let span = tracing::info_span!(
        "invocation",
        app = %context.app.name,
        action = %request.action,
        execution_id = %context.execution_id
    );

    async move {
        let InvocationRequest { action: name, params } = request;

        let Some(action) = registry.get(&name) else {
            tracing::warn!("Action not found");
            return InvocationResult::not_found(&name, registry.available());
        };

        tracing::debug!(
            description = action.description(),
            param_count = params.len(),
            "Executing action"
        );
        let started = Instant::now();
        let outcome = AssertUnwindSafe(action.execute(context, params))
            .catch_unwind()
            .await;
        let duration_ms = started.elapsed().as_millis() as u64;

        match outcome {
            Ok(Ok(payload)) => {
                tracing::info!(duration_ms, "Action completed");
                InvocationResult::success(payload)
            }
            Ok(Err(e)) => {
                log_action_error(&e, duration_ms);
                InvocationResult::failure(name, e.to_string())
            }
            Err(panic) => {
                let message = format!("action panicked: {}", panic_message(panic.as_ref()));
                tracing::error!(duration_ms, error = %message, "Action panicked");
                InvocationResult::failure(name, message)
            }
        }
    }
    .instrument(span)
    .await
}

fn log_action_error(error: &ActionError, duration_ms: u64) {
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(duration_ms, error = %error, "Action rejected its parameters")
        }
        LogLevel::Warn => tracing::warn!(duration_ms, error = %error, "Action failed"),
        LogLevel::Error => {
            tracing::error!(duration_ms, error = ?error, "Action failed unexpectedly")
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Process entry point shared by the app binaries.
///
/// Reads the environment, runs the invocation and prints the result line.
pub async fn main_with(registry: anyhow::Result<ActionRegistry>) -> ExitCode {
    let config = RunnerConfig::from_env();

    let registry = match registry {
        Ok(registry) => registry,
        Err(e) => {
            tracing::error!(error = %e, "Failed to build the action registry");
            return ExitCode::FAILURE;
        }
    };

    let outcome = run(&registry, &config).await;
    if let Some(line) = &outcome.line {
        println!("{}", line);
    }
    ExitCode::from(outcome.exit_code)
}
