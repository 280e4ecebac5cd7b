//! Task Processor: materializes a `Task`'s `ProcessCfg` against a single
//! request's route captures and query parameters, launches it, and maps the
//! outcome onto an HTTP reply.

use crate::error::TaskError;
use crate::launcher;
use crate::task::{ProcessCfg, ProcessResult, Task};
use std::collections::HashMap;

/// Which of the two launch disciplines a route was registered under
/// (`GET` is registered as `WaitingForResult`, `POST` as `Detached`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchMode {
    WaitingForResult,
    Detached,
}

/// An HTTP reply a Task Processor hands back to the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

impl Reply {
    fn ok(body: impl Into<String>) -> Reply {
        Reply { status: 200, body: body.into() }
    }

    fn from_task_error(err: &TaskError) -> Reply {
        Reply { status: err.status_code(), body: err.to_string() }
    }
}

/// The seam between a Task Processor and the Process Launcher. Production
/// code uses `RealLauncher`; tests substitute a fake that returns canned
/// `ProcessResult`s without spawning anything.
pub trait Launcher: Send + Sync {
    fn launch(&self, cfg: &ProcessCfg) -> Result<ProcessResult, TaskError>;

    fn launch_detached(
        &self,
        cfg: &ProcessCfg,
        on_complete: Box<dyn FnOnce(Result<ProcessResult, TaskError>) + Send>,
    ) -> Result<(), TaskError>;
}

/// The production `Launcher`, backed by `crate::launcher`.
pub struct RealLauncher;

impl Launcher for RealLauncher {
    fn launch(&self, cfg: &ProcessCfg) -> Result<ProcessResult, TaskError> {
        launcher::launch(cfg)
    }

    fn launch_detached(
        &self,
        cfg: &ProcessCfg,
        on_complete: Box<dyn FnOnce(Result<ProcessResult, TaskError>) + Send>,
    ) -> Result<(), TaskError> {
        launcher::launch_detached(cfg, move |result| on_complete(result))
    }
}

/// Substitute `task`'s `commandParams` placeholders from `route_values`
/// (parallel to `task.route_params()`) and `query`, then launch the
/// materialized command in `mode` via `launcher` and produce the reply.
pub fn process(
    task: &Task,
    mode: LaunchMode,
    route_values: &[String],
    query: &HashMap<String, String>,
    launcher: &dyn Launcher,
) -> Reply {
    let mut cfg = task.process.clone();

    let route_lookup: HashMap<&str, &str> = task
        .route_params()
        .iter()
        .map(|s| s.as_str())
        .zip(route_values.iter().map(|s| s.as_str()))
        .collect();

    for name in &cfg.command_params.clone() {
        let placeholder = format!("{{{{{name}}}}}");
        let value = route_lookup
            .get(name.as_str())
            .map(|v| v.to_string())
            .or_else(|| query.get(name).cloned());

        match value {
            Some(value) => {
                cfg.command = cfg.command.replace(&placeholder, &value);
            }
            None => {
                return Reply::from_task_error(&TaskError::MissingParameter {
                    command: cfg.command.clone(),
                    parameter: name.clone(),
                });
            }
        }
    }

    match mode {
        LaunchMode::WaitingForResult => match launcher.launch(&cfg) {
            Ok(result) => {
                let body = match result.exit_code {
                    Some(0) => result.output,
                    _ => format!("{}\n{}", result.output, result.error_output),
                };
                Reply::ok(body)
            }
            Err(err) => Reply::from_task_error(&err),
        },
        LaunchMode::Detached => {
            let on_complete: Box<dyn FnOnce(Result<ProcessResult, TaskError>) + Send> =
                Box::new(|result| match result {
                    Ok(result) => {
                        tracing::info!(exit_code = ?result.exit_code, "detached task completed");
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "detached task failed to launch");
                    }
                });
            match launcher.launch_detached(&cfg, on_complete) {
                Ok(()) => Reply::ok("command launched and detached"),
                Err(err) => Reply::from_task_error(&err),
            }
        }
    }
}
