use std::path::PathBuf;

/// Errors that can abort the process before it starts serving requests:
/// bad CLI flags, an invalid config file, or a failure to bind the FastCGI
/// endpoint. Any variant here maps to exit code 1.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    ConfigInvalid(String),

    #[error("failed to create default config directory {path}: {source}")]
    ConfigBootstrap {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not determine the user config directory")]
    NoConfigDir,

    #[error("could not determine the user home directory")]
    NoHomeDir,

    #[error("--threads must be a positive integer, got {0}")]
    InvalidThreadCount(i64),

    #[error("failed to bind FastCGI endpoint {endpoint}: {source}")]
    BindFailed {
        endpoint: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to set up logging: {0}")]
    LoggingSetup(String),
}

/// Errors raised while materializing and launching a single task's process.
/// Each variant carries the context needed to render the HTTP diagnostic
/// body.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TaskError {
    #[error("Command '{0}' has an unclosed quotation mark")]
    UnclosedQuotation(String),

    #[error("the command is empty")]
    EmptyCommand,

    #[error("the command '{0}' contains a newline character, which is not allowed")]
    InvalidCommand(String),

    #[error("Couldn't find the executable of the command '{0}' to launch it")]
    ExecutableNotFound(String),

    #[error("Couldn't launch the command '{command}'. Request doesn't contain a parameter '{parameter}'")]
    MissingParameter { command: String, parameter: String },
}

impl TaskError {
    /// The HTTP status this error maps to in a processor reply.
    pub fn status_code(&self) -> u16 {
        match self {
            TaskError::MissingParameter { .. } => 422,
            TaskError::UnclosedQuotation(_)
            | TaskError::EmptyCommand
            | TaskError::InvalidCommand(_)
            | TaskError::ExecutableNotFound(_) => 424,
        }
    }
}
