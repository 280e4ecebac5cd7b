//! Configuration loading. The config file format is syntactically TOML, so
//! this module is a thin `serde`-driven layer on top of the `toml` crate.

use crate::error::StartupError;
use crate::task::TaskConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const PLACEHOLDER_DOC: &str = r#"# stone_skipper configuration.
#
# shell = "bash -ceo pipefail"
#
# [[tasks]]
#   route      = "/hello/{{name}}"
#   command    = "echo hello {{name}}"
#   workingDir = "/tmp"
"#;

/// Parsed config-file contents, before tasks are compiled into a
/// `TaskCatalog` and before `workingDir` defaults are applied.
#[derive(Debug, Deserialize)]
pub struct RawConfig {
    pub shell: Option<String>,
    #[serde(default)]
    pub tasks: Vec<TaskConfig>,
}

/// The validated, home-dir-defaulted result of loading a config file.
#[derive(Debug)]
pub struct Config {
    pub shell: Option<String>,
    pub tasks: Vec<TaskConfig>,
}

/// The default config path, `<user-config-dir>/stone_skipper/stone_skipper.cfg`.
pub fn default_config_path() -> Result<PathBuf, StartupError> {
    let base = dirs::config_dir().ok_or(StartupError::NoConfigDir)?;
    Ok(base.join("stone_skipper").join("stone_skipper.cfg"))
}

/// Load and validate the config file at `path`. If it doesn't exist, bootstrap
/// a placeholder document there first and return an empty config.
pub fn load(path: &Path) -> Result<Config, StartupError> {
    if !path.exists() {
        bootstrap(path)?;
        return Ok(Config { shell: None, tasks: vec![] });
    }

    let contents = std::fs::read_to_string(path).map_err(|source| StartupError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;

    let raw: RawConfig = toml::from_str(&contents).map_err(|source| StartupError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })?;

    for task in &raw.tasks {
        task.validate()?;
    }

    let home = dirs::home_dir().ok_or(StartupError::NoHomeDir)?;
    let tasks = raw
        .tasks
        .into_iter()
        .map(|mut task| {
            if task.working_dir.is_none() {
                task.working_dir = Some(home.clone());
            }
            task
        })
        .collect();

    Ok(Config { shell: raw.shell, tasks })
}

fn bootstrap(path: &Path) -> Result<(), StartupError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| StartupError::ConfigBootstrap {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(path, PLACEHOLDER_DOC).map_err(|source| StartupError::ConfigBootstrap {
        path: path.to_path_buf(),
        source,
    })
}
