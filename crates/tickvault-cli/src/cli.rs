//! CLI argument definitions for tickvault.
//!
//! Every flag has a default equal to the fixed configuration the tool ships
//! with, so `tickvault fetch` with no arguments runs the standard S&P 500
//! yearly download.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `fetch` | Scrape the constituent listing and archive one CSV per symbol |
//! | `history` | Fetch a single symbol's year and export it to a flat CSV |

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Default constituent listing scraped by `fetch`.
pub const SP500_LISTING_URL: &str = "https://en.wikipedia.org/wiki/List_of_S%26P_500_companies";

/// Archives daily OHLCV history, one CSV file per symbol per year.
#[derive(Debug, Parser)]
#[command(
    name = "tickvault",
    author,
    version,
    about = "Yearly equity price archiver",
    long_about = "Tickvault scrapes an exchange constituent listing, downloads each \
symbol's daily OHLCV history for a calendar year, and archives one CSV file per \
symbol. Symbols whose file already exists on disk are skipped, so interrupted \
runs resume where they left off."
)]
pub struct Cli {
    /// Base directory for persisted CSV series.
    #[arg(long, global = true, default_value = "data")]
    pub data_dir: PathBuf,

    /// Directory for the rotating daily log files.
    #[arg(long, global = true, default_value = "logs")]
    pub log_dir: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Scrape the symbol listing and download the year for every symbol.
    ///
    /// Writes `<data-dir>/<year>/<symbol>_<year>.csv` per symbol, pausing a
    /// fixed delay between provider calls. Already-archived symbols are
    /// skipped without a provider call.
    Fetch(FetchArgs),

    /// Fetch one symbol's year and export it to `<data-dir>/<symbol>_<year>.csv`.
    History(HistoryArgs),
}

/// Arguments for the `fetch` command.
#[derive(Debug, Args)]
pub struct FetchArgs {
    /// Exchange label, used only for reporting.
    #[arg(long, default_value = "sp500")]
    pub exchange: String,

    /// Listing page expected to contain a table with a `Symbol` column.
    #[arg(long, default_value = SP500_LISTING_URL)]
    pub listing_url: String,

    /// Calendar year to download.
    #[arg(long, default_value_t = 2018)]
    pub year: i32,

    /// Fixed pause between provider calls, in seconds.
    #[arg(long, default_value_t = 12)]
    pub delay_secs: u64,
}

/// Arguments for the `history` command.
#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// Ticker symbol to query.
    pub symbol: String,

    /// Calendar year to download.
    #[arg(long, default_value_t = 2018)]
    pub year: i32,
}
