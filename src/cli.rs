//! Command-line flags, expressed as a `clap` derive struct.

use crate::error::StartupError;
use clap::Parser;
use std::path::PathBuf;

fn default_shell() -> &'static str {
    if cfg!(windows) {
        "cmd.exe /c"
    } else {
        "bash -ceo pipefail"
    }
}

#[derive(Parser, Debug)]
#[command(name = "stone_skipper", about = "FastCGI responder that launches configured tasks")]
pub struct Cli {
    /// Append logs to this file in addition to stdout.
    #[arg(long = "log", value_name = "PATH")]
    pub log: Option<PathBuf>,

    /// Configuration file path. Defaults to `<user-config-dir>/stone_skipper/stone_skipper.cfg`.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// FastCGI endpoint: `ipAddress:port` for TCP, or any string without a colon for a Unix socket.
    #[arg(long = "fcgiAddress", value_name = "ENDPOINT")]
    pub fcgi_address: String,

    /// Shell prefix to prepend when launching tasks that use `command`.
    #[arg(long = "shell", value_name = "STRING")]
    pub shell: Option<String>,

    /// Worker thread count.
    #[arg(long = "threads", default_value_t = 1)]
    pub threads: i64,
}

impl Cli {
    pub fn validate(&self) -> Result<(), StartupError> {
        if self.threads <= 0 {
            return Err(StartupError::InvalidThreadCount(self.threads));
        }
        Ok(())
    }

    /// `--shell`, falling back to the config file's `shell` key, falling back
    /// to the platform default.
    pub fn resolved_shell(&self, config_shell: Option<&str>) -> String {
        self.shell
            .clone()
            .or_else(|| config_shell.map(str::to_string))
            .unwrap_or_else(|| default_shell().to_string())
    }
}

/// A parsed `--fcgiAddress` value: either a TCP socket or a Unix-domain path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FcgiEndpoint {
    Tcp(String),
    Unix(PathBuf),
}

pub fn parse_fcgi_address(raw: &str) -> FcgiEndpoint {
    if raw.contains(':') {
        FcgiEndpoint::Tcp(raw.to_string())
    } else {
        FcgiEndpoint::Unix(PathBuf::from(raw))
    }
}
