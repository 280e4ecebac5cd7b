//! Process Launcher: asynchronously spawns a child process, streams its
//! stdout and stderr, and invokes a completion callback with the exit code
//! and captured output.

use crate::error::TaskError;
use crate::line_parse;
use crate::task::{ProcessCfg, ProcessResult};
use crate::tokenizer;
use crate::which;
use std::io::BufReader;
use std::process;
use std::thread;

/// Launch `cfg` and block the calling thread until the child exits, then
/// return its `ProcessResult`. This is the `WaitingForResult` launch
/// discipline — "asynchronous" with respect to the
/// wider server (other FastCGI connections keep being served by other pooled
/// threads) even though this call itself blocks its own worker thread.
pub fn launch(cfg: &ProcessCfg) -> Result<ProcessResult, TaskError> {
    let (mut child, _resolved) = spawn(cfg)?;

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let stdout_handle = stdout.map(|pipe| thread::spawn(move || read_all(pipe)));
    let stderr_handle = stderr.map(|pipe| thread::spawn(move || read_all(pipe)));

    let (output, stdout_err) = match stdout_handle {
        Some(h) => h.join().unwrap_or_else(|_| (String::new(), None)),
        None => (String::new(), None),
    };
    let (error_output, stderr_err) = match stderr_handle {
        Some(h) => h.join().unwrap_or_else(|_| (String::new(), None)),
        None => (String::new(), None),
    };

    let wait_result = child.wait();

    let mut output = output;
    if let Some(e) = stdout_err.or(stderr_err) {
        // A supervision error occurred while streaming. Fold the diagnostic
        // into stdout and still report whatever exit code we observed
        // still report whatever exit code we observed.
        output.push_str(&format!("\n[stone_skipper: error reading child output: {e}]"));
    }

    let exit_code = match &wait_result {
        Ok(status) => status.code(),
        Err(_) => None,
    };

    Ok(ProcessResult {
        exit_code,
        output,
        error_output,
    })
}

/// Launch `cfg` without waiting for completion. Returns once the process has
/// been spawned; `on_complete` fires later on a detached supervisor thread
/// but its result is only logged, never delivered to an HTTP response
/// ("Detached mode": started, not awaited).
pub fn launch_detached(
    cfg: &ProcessCfg,
    on_complete: impl FnOnce(Result<ProcessResult, TaskError>) + Send + 'static,
) -> Result<(), TaskError> {
    let (child, _resolved) = spawn(cfg)?;
    let mut child = child;

    thread::spawn(move || {
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let stdout_handle = stdout.map(|pipe| thread::spawn(move || read_all(pipe)));
        let stderr_handle = stderr.map(|pipe| thread::spawn(move || read_all(pipe)));

        let (mut output, stdout_err) = match stdout_handle {
            Some(h) => h.join().unwrap_or_else(|_| (String::new(), None)),
            None => (String::new(), None),
        };
        let (error_output, stderr_err) = match stderr_handle {
            Some(h) => h.join().unwrap_or_else(|_| (String::new(), None)),
            None => (String::new(), None),
        };

        let wait_result = child.wait();
        if let Some(e) = stdout_err.or(stderr_err) {
            output.push_str(&format!("\n[stone_skipper: error reading child output: {e}]"));
        }
        let exit_code = match &wait_result {
            Ok(status) => status.code(),
            Err(_) => None,
        };

        on_complete(Ok(ProcessResult {
            exit_code,
            output,
            error_output,
        }));
    });

    Ok(())
}

/// Builds the argv for `cfg` (tokenizing `shellCommand`/`command` per
/// the shell-prefix-vs-direct-command rule), resolves the executable, and spawns it with
/// stdout/stderr piped.
fn spawn(cfg: &ProcessCfg) -> Result<(process::Child, std::path::PathBuf), TaskError> {
    if cfg.command.contains('\n') {
        return Err(TaskError::InvalidCommand(cfg.command.clone()));
    }
    if let Some(shell_command) = &cfg.shell_command {
        if shell_command.contains('\n') {
            return Err(TaskError::InvalidCommand(shell_command.clone()));
        }
    }

    let mut argv = if let Some(shell_command) = &cfg.shell_command {
        let mut prefix = tokenizer::tokenize(shell_command)?;
        prefix.push(cfg.command.clone());
        prefix
    } else {
        tokenizer::tokenize(&cfg.command)?
    };

    if argv.is_empty() {
        return Err(TaskError::EmptyCommand);
    }

    let executable = argv.remove(0);
    let resolved = which::resolve(&executable, cfg.working_dir.as_deref())
        .ok_or_else(|| TaskError::ExecutableNotFound(executable.clone()))?;

    let mut command = process::Command::new(&resolved);
    command.args(&argv);
    if let Some(dir) = &cfg.working_dir {
        command.current_dir(dir);
    }
    command.stdout(process::Stdio::piped());
    command.stderr(process::Stdio::piped());

    let child = command
        .spawn()
        .map_err(|_| TaskError::ExecutableNotFound(executable.clone()))?;

    Ok((child, resolved))
}

/// Reads `pipe` line-by-line into an accumulating buffer until EOF, using a
/// line-ending-aware reader so CR, LF, and CRLF endings are all handled.
/// On any I/O error, stops reading and returns the bytes captured so far
/// alongside the error, rather than losing them.
fn read_all<R: std::io::Read>(pipe: R) -> (String, Option<std::io::Error>) {
    let mut reader = BufReader::new(pipe);
    let mut out = Vec::new();
    loop {
        match line_parse::get_line(&mut reader) {
            Ok(Some((_ending, mut bytes))) => {
                out.append(&mut bytes);
                out.push(b'\n');
            }
            Ok(None) => return (String::from_utf8_lossy(&out).into_owned(), None),
            Err(e) => return (String::from_utf8_lossy(&out).into_owned(), Some(e)),
        }
    }
}
