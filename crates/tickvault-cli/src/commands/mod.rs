mod fetch;
mod history;

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub async fn run(cli: &Cli) -> Result<(), CliError> {
    match &cli.command {
        Command::Fetch(args) => fetch::run(cli, args).await,
        Command::History(args) => history::run(cli, args).await,
    }
}
