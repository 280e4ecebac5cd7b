//! End-to-end scenarios driven through a fake launcher that returns canned
//! `ProcessResult`s, covering route/query substitution, missing-parameter
//! and executable-not-found diagnostics, and the detached launch discipline.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use stone_skipper::error::TaskError;
use stone_skipper::processor::{process, Launcher, LaunchMode};
use stone_skipper::route::CompiledRoute;
use stone_skipper::task::{ProcessCfg, ProcessResult, Task, TaskCatalog, TaskConfig};

struct FakeLauncher {
    result: Result<ProcessResult, TaskError>,
    launch_count: Arc<AtomicUsize>,
}

impl FakeLauncher {
    fn succeeding(output: &str) -> FakeLauncher {
        FakeLauncher {
            result: Ok(ProcessResult {
                exit_code: Some(0),
                output: output.to_string(),
                error_output: String::new(),
            }),
            launch_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn not_found(command: &str) -> FakeLauncher {
        FakeLauncher {
            result: Err(TaskError::ExecutableNotFound(command.to_string())),
            launch_count: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl Launcher for FakeLauncher {
    fn launch(&self, _cfg: &ProcessCfg) -> Result<ProcessResult, TaskError> {
        self.launch_count.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }

    fn launch_detached(
        &self,
        _cfg: &ProcessCfg,
        on_complete: Box<dyn FnOnce(Result<ProcessResult, TaskError>) + Send>,
    ) -> Result<(), TaskError> {
        self.launch_count.fetch_add(1, Ordering::SeqCst);
        match &self.result {
            Ok(result) => {
                on_complete(Ok(result.clone()));
                Ok(())
            }
            Err(err) => Err(err.clone()),
        }
    }
}

fn single_task(cfg: TaskConfig) -> Task {
    TaskCatalog::build(&[cfg], "sh -c").tasks()[0].clone()
}

/// Scenario 1: `GET /hi` replies 200 with the canned stdout.
#[test]
fn scenario_get_returns_canned_output() {
    let task = single_task(TaskConfig {
        route: "/hi".to_string(),
        command: "echo hi".to_string(),
        process: String::new(),
        working_dir: None,
    });
    let launcher = FakeLauncher::succeeding("hi\n");

    let reply = process(&task, LaunchMode::WaitingForResult, &[], &HashMap::new(), &launcher);

    assert_eq!(reply.status, 200);
    assert_eq!(reply.body, "hi\n");
}

/// Scenario 2: `GET /echo/world` materializes `echo {{x}}` to `echo world`
/// before launching; the fake doesn't care about the exact command, so this
/// asserts the route capture was consumed instead of rejected.
#[test]
fn scenario_route_param_materializes_command() {
    let task = single_task(TaskConfig {
        route: "/echo/{{x}}".to_string(),
        command: "echo {{x}}".to_string(),
        process: String::new(),
        working_dir: None,
    });
    let launcher = FakeLauncher::succeeding("world\n");

    let captures = task.route_matcher.captures("/echo/world").unwrap();
    let reply = process(&task, LaunchMode::WaitingForResult, &captures, &HashMap::new(), &launcher);

    assert_eq!(reply.status, 200);
    assert_eq!(reply.body, "world\n");
}

/// Scenario 3: `GET /q?x=yo` materializes via the query string; `GET /q`
/// without `x` replies 422 naming the missing parameter.
#[test]
fn scenario_query_param_materializes_command_or_422() {
    let task = single_task(TaskConfig {
        route: "/q".to_string(),
        command: "echo {{x}}".to_string(),
        process: String::new(),
        working_dir: None,
    });
    let launcher = FakeLauncher::succeeding("yo\n");

    let mut query = HashMap::new();
    query.insert("x".to_string(), "yo".to_string());
    let reply = process(&task, LaunchMode::WaitingForResult, &[], &query, &launcher);
    assert_eq!(reply.status, 200);
    assert_eq!(reply.body, "yo\n");

    let reply = process(&task, LaunchMode::WaitingForResult, &[], &HashMap::new(), &launcher);
    assert_eq!(reply.status, 422);
    assert!(reply.body.contains('x'));
}

/// Scenario 4: the configured executable can't be found → 424 naming it.
#[test]
fn scenario_executable_not_found_is_424() {
    let task = single_task(TaskConfig {
        route: "/run".to_string(),
        command: String::new(),
        process: "does_not_exist_42".to_string(),
        working_dir: None,
    });
    let launcher = FakeLauncher::not_found("does_not_exist_42");

    let reply = process(&task, LaunchMode::WaitingForResult, &[], &HashMap::new(), &launcher);

    assert_eq!(reply.status, 424);
    assert!(reply.body.contains("does_not_exist_42"));
}

/// Scenario 5: `POST /hi` replies 200 immediately with a "launched and
/// detached" message; the fake launcher is invoked exactly once and its
/// canned output never appears in the response.
#[test]
fn scenario_detached_replies_immediately_without_output() {
    let task = single_task(TaskConfig {
        route: "/hi".to_string(),
        command: "echo hi".to_string(),
        process: String::new(),
        working_dir: None,
    });
    let launcher = FakeLauncher::succeeding("hi\n");

    let reply = process(&task, LaunchMode::Detached, &[], &HashMap::new(), &launcher);

    assert_eq!(reply.status, 200);
    assert_eq!(reply.body, "command launched and detached");
    assert!(!reply.body.contains("hi\n"));
    assert_eq!(launcher.launch_count.load(Ordering::SeqCst), 1);
}

/// Scenario 6: no configured task covers this path and method, so the
/// dispatcher itself (not the processor) must reply 404. Exercised directly
/// against the routing predicate since the processor is only invoked once a
/// route has already matched.
#[test]
fn scenario_no_route_match_is_dispatcher_concern() {
    let task = single_task(TaskConfig {
        route: "/hi".to_string(),
        command: "echo hi".to_string(),
        process: String::new(),
        working_dir: None,
    });

    assert!(task.route_matcher.captures("/nope").is_none());
}
