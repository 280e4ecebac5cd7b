//! Narrow wrapper around the `fastcgi` crate, treating the wire protocol
//! itself as an external collaborator. Translates a raw FastCGI request into
//! the plain method/path/query triple the core cares about, and writes a
//! status+body reply back.

use crate::cli::FcgiEndpoint;
use crate::error::StartupError;
use std::collections::HashMap;
use std::io::Write;
use std::net::TcpListener;
use std::os::unix::net::UnixListener;
use std::sync::Arc;
use threadpool::ThreadPool;

/// The subset of an incoming FastCGI request the core's dispatcher needs.
pub struct IncomingRequest {
    pub method: String,
    pub path: String,
    pub query: HashMap<String, String>,
}

fn incoming_from(raw: &fastcgi::Request) -> IncomingRequest {
    let method = raw
        .param("REQUEST_METHOD")
        .unwrap_or_else(|| "GET".to_string());
    let path = raw
        .param("DOCUMENT_URI")
        .or_else(|| raw.param("SCRIPT_NAME"))
        .unwrap_or_else(|| "/".to_string());
    let query_string = raw.param("QUERY_STRING").unwrap_or_default();
    let query = url::form_urlencoded::parse(query_string.as_bytes())
        .into_owned()
        .collect::<HashMap<String, String>>();

    IncomingRequest { method, path, query }
}

/// Write a plain-text CGI response (status line + body) to `raw`.
fn reply(raw: &mut fastcgi::Request, status: u16, body: &str) {
    let mut out = raw.stdout();
    let _ = write!(
        out,
        "Status: {status}\r\nContent-Type: text/plain\r\n\r\n{body}"
    );
}

/// Accept connections on `endpoint` forever, dispatching each request to
/// `handler` on a bounded pool of `thread_count` workers. The
/// calling thread blocks here until the process is killed.
pub fn serve(
    endpoint: &FcgiEndpoint,
    thread_count: usize,
    handler: impl Fn(IncomingRequest) -> (u16, String) + Send + Sync + 'static,
) -> Result<(), StartupError> {
    let pool = ThreadPool::new(thread_count);
    let handler = Arc::new(handler);

    let run_handler = move |mut raw: fastcgi::Request| {
        let incoming = incoming_from(&raw);
        let handler = Arc::clone(&handler);
        let (tx, rx) = std::sync::mpsc::channel();
        pool.execute(move || {
            let result = handler(incoming);
            let _ = tx.send(result);
        });
        if let Ok((status, body)) = rx.recv() {
            reply(&mut raw, status, &body);
        }
    };

    match endpoint {
        FcgiEndpoint::Tcp(addr) => {
            let listener = TcpListener::bind(addr).map_err(|source| StartupError::BindFailed {
                endpoint: addr.clone(),
                source,
            })?;
            fastcgi::run_tcp(run_handler, listener)
                .map_err(|source| StartupError::BindFailed { endpoint: addr.clone(), source })
        }
        FcgiEndpoint::Unix(path) => {
            let listener = UnixListener::bind(path).map_err(|source| StartupError::BindFailed {
                endpoint: path.display().to_string(),
                source,
            })?;
            fastcgi::run_unix(run_handler, listener).map_err(|source| StartupError::BindFailed {
                endpoint: path.display().to_string(),
                source,
            })
        }
    }
}
