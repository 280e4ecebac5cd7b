//! Dispatcher / Server: matches each inbound request against the compiled
//! Task Catalog and invokes the Task Processor in the launch mode registered
//! for the request's method.

use crate::cli::FcgiEndpoint;
use crate::error::StartupError;
use crate::fastcgi_transport::{self, IncomingRequest};
use crate::processor::{self, LaunchMode, Launcher, RealLauncher};
use crate::task::TaskCatalog;

const NOT_FOUND_BODY: &str = "Unknown task";

/// Bind `endpoint` and serve requests against `catalog` forever, using
/// `thread_count` worker threads. Blocks the calling thread.
pub fn run(catalog: TaskCatalog, thread_count: usize, endpoint: FcgiEndpoint) -> Result<(), StartupError> {
    fastcgi_transport::serve(&endpoint, thread_count, move |request| {
        dispatch(&catalog, request, &RealLauncher)
    })
}

/// Select the first Task whose route matches `request.path` and whose method
/// is `GET`/`POST`, and run it. Routes are tried in declaration order
/// (ties broken by whichever route was declared first).
fn dispatch(catalog: &TaskCatalog, request: IncomingRequest, launcher: &dyn Launcher) -> (u16, String) {
    let mode = match request.method.as_str() {
        "GET" => LaunchMode::WaitingForResult,
        "POST" => LaunchMode::Detached,
        _ => {
            tracing::warn!(method = %request.method, path = %request.path, "unsupported method");
            return (404, NOT_FOUND_BODY.to_string());
        }
    };

    for task in catalog.tasks() {
        if let Some(captures) = task.route_matcher.captures(&request.path) {
            tracing::info!(path = %request.path, method = %request.method, "dispatching request");
            let reply = processor::process(task, mode, &captures, &request.query, launcher);
            return (reply.status, reply.body);
        }
    }

    tracing::info!(path = %request.path, "no route matched");
    (404, NOT_FOUND_BODY.to_string())
}
