mod cli;
mod commands;
mod error;
mod logging;

use clap::Parser;
use std::process::ExitCode;
use tracing::error;

use crate::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Held for the process lifetime so the file appender flushes on exit.
    let _log_guard = match logging::init(&cli.log_dir) {
        Ok(guard) => Some(guard),
        Err(err) => {
            eprintln!("warning: {err}; continuing without file logging");
            None
        }
    };

    // Anything escaping a command is logged, never re-raised: the process
    // exits 0 whether or not individual symbols succeeded.
    if let Err(err) = commands::run(&cli).await {
        error!(%err, "run failed");
    }

    ExitCode::SUCCESS
}
