use std::process::ExitCode;

use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::domain::error::Result;
use crate::infrastructure::config::ConfigService;
use crate::interfaces::cli::{self, CliCommand, CliState};

/// Entry point of the `inventory-import` binary
pub async fn run() -> ExitCode {
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let command = match cli::parse_args(std::env::args().skip(1)) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{}\n\n{}", e, cli::USAGE);
            return ExitCode::FAILURE;
        }
    };

    match dispatch(command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn dispatch(command: CliCommand) -> Result<()> {
    if command == CliCommand::Help {
        println!("{}", cli::USAGE);
        return Ok(());
    }

    let config = ConfigService::new().load()?;
    let state = CliState::new(config)?;
    cli::execute(&state, command).await
}
