//! Resolves an executable name against the platform's executable search path,
//! augmented with a task's configured working directory.

use std::env;
use std::path::{Path, PathBuf};

/// Search `PATH` (plus `extra_dir`, if given) for an executable named
/// `exec_name`. Returns the full path to the first match.
///
/// If `exec_name` already contains a path separator, it is checked directly
/// (relative to `extra_dir` when that is set) rather than searched for on
/// `PATH`, matching how a shell resolves `./foo` or `/usr/bin/foo` style
/// commands.
pub fn resolve(exec_name: &str, extra_dir: Option<&Path>) -> Option<PathBuf> {
    if exec_name.contains(std::path::MAIN_SEPARATOR) || exec_name.contains('/') {
        let candidate = match extra_dir {
            Some(dir) => dir.join(exec_name),
            None => PathBuf::from(exec_name),
        };
        return is_executable_file(&candidate).then_some(candidate);
    }

    for dir in search_dirs(extra_dir) {
        let candidate = dir.join(exec_name);
        if is_executable_file(&candidate) {
            return Some(candidate);
        }
        #[cfg(windows)]
        {
            let with_ext = dir.join(format!("{exec_name}.exe"));
            if is_executable_file(&with_ext) {
                return Some(with_ext);
            }
        }
    }
    None
}

/// Whether an executable named `exec_name` can be found on `PATH` plus
/// `extra_dir`.
pub fn exec_exists(exec_name: &str, extra_dir: Option<&Path>) -> bool {
    resolve(exec_name, extra_dir).is_some()
}

fn search_dirs(extra_dir: Option<&Path>) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = env::var_os("PATH")
        .map(|p| env::split_paths(&p).collect())
        .unwrap_or_default();
    if let Some(dir) = extra_dir {
        dirs.push(dir.to_path_buf());
    }
    dirs
}

#[cfg(unix)]
fn is_executable_file(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    match std::fs::metadata(path) {
        Ok(meta) => meta.is_file() && meta.permissions().mode() & 0o111 != 0,
        Err(_) => false,
    }
}

#[cfg(windows)]
fn is_executable_file(path: &Path) -> bool {
    path.is_file()
}
