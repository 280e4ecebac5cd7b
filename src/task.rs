//! Data model and Task Catalog.

use crate::error::StartupError;
use crate::route::{placeholder_names, CompiledRoute};
use serde::Deserialize;
use std::path::PathBuf;

/// One `[[tasks]]` entry as read from the config file, before compilation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskConfig {
    pub route: String,
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub process: String,
    #[serde(default)]
    pub working_dir: Option<PathBuf>,
}

impl TaskConfig {
    /// Validate this entry's invariants: `route` must start with `/`, and
    /// exactly one of `command`/`process` must be non-empty.
    pub fn validate(&self) -> Result<(), StartupError> {
        if !self.route.starts_with('/') {
            return Err(StartupError::ConfigInvalid(format!(
                "task route '{}' must start with '/'",
                self.route
            )));
        }
        match (self.command.is_empty(), self.process.is_empty()) {
            (true, true) => Err(StartupError::ConfigInvalid(format!(
                "task '{}' must have 'command' or 'process' set",
                self.route
            ))),
            (false, false) => Err(StartupError::ConfigInvalid(format!(
                "task '{}' can't have both 'command' and 'process' set",
                self.route
            ))),
            _ => Ok(()),
        }
    }
}

/// A fully materialized plan for running a single child process. The
/// `command` template still contains `{{name}}` placeholders until
/// [`crate::processor::process`] substitutes them for a specific request.
#[derive(Debug, Clone)]
pub struct ProcessCfg {
    pub command: String,
    pub shell_command: Option<String>,
    pub working_dir: Option<PathBuf>,
    pub command_params: Vec<String>,
}

/// The outcome of a completed process launch.
#[derive(Debug, Clone)]
pub struct ProcessResult {
    pub exit_code: Option<i32>,
    pub output: String,
    pub error_output: String,
}

/// One compiled route+command mapping. Built once at startup and shared
/// read-only across all request handlers.
#[derive(Debug, Clone)]
pub struct Task {
    pub route_matcher: CompiledRoute,
    pub process: ProcessCfg,
}

impl Task {
    /// Compile a `TaskConfig` into a `Task`. `shell_cmd` is the shell prefix
    /// (from `--shell` or the config's `shell` override) attached to the
    /// `ProcessCfg` only when the task used `command` rather than `process`.
    pub fn compile(cfg: &TaskConfig, shell_cmd: &str) -> Task {
        let route_matcher = CompiledRoute::compile(&cfg.route);

        let (command, shell_command) = if !cfg.command.is_empty() {
            (cfg.command.clone(), Some(shell_cmd.to_string()))
        } else {
            (cfg.process.clone(), None)
        };

        let command_params = placeholder_names(&command);

        Task {
            route_matcher,
            process: ProcessCfg {
                command,
                shell_command,
                working_dir: cfg.working_dir.clone(),
                command_params,
            },
        }
    }

    pub fn route_params(&self) -> &[String] {
        self.route_matcher.params()
    }
}

/// The immutable set of compiled tasks, built once from configuration and
/// shared by reference across all request handlers.
#[derive(Debug, Clone, Default)]
pub struct TaskCatalog {
    tasks: Vec<Task>,
}

impl TaskCatalog {
    /// Compile every `TaskConfig` in `configs` using `shell_cmd` as the
    /// default shell prefix.
    pub fn build(configs: &[TaskConfig], shell_cmd: &str) -> TaskCatalog {
        let tasks = configs.iter().map(|c| Task::compile(c, shell_cmd)).collect();
        TaskCatalog { tasks }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }
}
