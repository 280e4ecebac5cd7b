use clap::Parser;
use std::process::ExitCode;
use stone_skipper::cli::{parse_fcgi_address, Cli};
use stone_skipper::config;
use stone_skipper::dispatcher;
use stone_skipper::error::StartupError;
use stone_skipper::logging;
use stone_skipper::task::TaskCatalog;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("stone_skipper: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), StartupError> {
    let _log_guard = logging::init(cli.log.as_deref())?;

    cli.validate()?;

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => config::default_config_path()?,
    };
    tracing::info!(path = %config_path.display(), "loading config");

    let config = config::load(&config_path)?;
    let shell = cli.resolved_shell(config.shell.as_deref());
    let catalog = TaskCatalog::build(&config.tasks, &shell);
    tracing::info!(task_count = catalog.tasks().len(), "built task catalog");

    let endpoint = parse_fcgi_address(&cli.fcgi_address);
    tracing::info!(threads = cli.threads, "starting dispatcher");
    dispatcher::run(catalog, cli.threads as usize, endpoint)
}
