use clap::Parser;
use std::process::ExitCode;

mod cli;
mod commands;
mod dispatch;
mod output;

use cli::Cli;
use commands::config::load_config;
use commands::{CommandContext, CommandError};
use dispatch::{LocalCommand, LocalDispatch, StoreCommand, StoreDispatch};
use mailfilter_core::StoreError;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                let error_json = serde_json::json!({
                    "error": {
                        "code": error_code(&e),
                        "message": e.to_string(),
                    }
                });
                match serde_json::to_string_pretty(&error_json) {
                    Ok(text) => eprintln!("{text}"),
                    Err(_) => eprintln!("Error: {e}"),
                }
            } else {
                eprintln!("Error: {e}");
            }
            ExitCode::from(exit_status(&e))
        }
    }
}

/// Installs the logger. `RUST_LOG` overrides the level picked from flags.
fn init_logging(cli: &Cli) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level(cli)))
        .format_timestamp(None)
        .init();
}

/// Returns the default log filter for the verbosity flags.
fn log_level(cli: &Cli) -> &'static str {
    if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    }
}

async fn run(cli: &Cli) -> commands::Result<()> {
    // Config commands report a broken config file themselves.
    if let Some(dispatch) = LocalDispatch::try_from_cli(cli) {
        let ctx = CommandContext::from_cli(cli, &load_config().unwrap_or_default());
        return dispatch.execute(&ctx);
    }

    let config = load_config()?;
    let ctx = CommandContext::from_cli(cli, &config);

    match StoreDispatch::from_cli(cli) {
        Some(dispatch) => dispatch.execute(&ctx).await,
        None => Ok(()),
    }
}

/// Returns the error code string for JSON output.
fn error_code(e: &CommandError) -> &'static str {
    match e {
        CommandError::Store(_) => "STORE_ERROR",
        CommandError::Codec(_) => "DOCUMENT_ERROR",
        CommandError::FilterSet(_) => "FILTER_ERROR",
        CommandError::NotFound { .. } => "NOT_FOUND",
        CommandError::Ambiguous { .. } => "AMBIGUOUS_ID",
        CommandError::Config(_) => "CONFIG_ERROR",
        CommandError::Io(_) => "IO_ERROR",
        CommandError::Json(_) => "JSON_ERROR",
    }
}

/// Returns the process exit status for an error.
fn exit_status(e: &CommandError) -> u8 {
    match e {
        CommandError::FilterSet(_) => 1,
        CommandError::NotFound { .. } => 1,
        CommandError::Ambiguous { .. } => 1,
        CommandError::Json(_) => 1,
        CommandError::Codec(_) => 2,
        CommandError::Io(_) => 3,
        CommandError::Store(StoreError::InvalidFormat { .. }) => 4,
        CommandError::Store(StoreError::Json(_)) => 4,
        CommandError::Store(_) => 3,
        CommandError::Config(_) => 5,
    }
}
