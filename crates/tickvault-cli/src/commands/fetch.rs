//! The batch pipeline: listing scrape, then one fetch-and-persist pass.

use std::sync::Arc;

use tickvault_core::{
    BatchRunner, FixedDelay, HttpClient, Period, ReqwestHttpClient, SymbolLister,
    YahooChartAdapter,
};
use tickvault_store::CsvStore;
use tracing::info;

use crate::cli::{Cli, FetchArgs};
use crate::error::CliError;

pub async fn run(cli: &Cli, args: &FetchArgs) -> Result<(), CliError> {
    let period = Period::new(args.year)?;
    let http: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::new());

    let lister = SymbolLister::new(Arc::clone(&http));
    let symbols = lister.list_symbols(&args.exchange, &args.listing_url).await;
    if symbols.is_empty() {
        // An unreachable or unparsable listing already logged its failure;
        // an empty listing is a no-op run, not an error.
        info!(exchange = args.exchange.as_str(), "no symbols to process");
        return Ok(());
    }

    let runner = BatchRunner::new(
        Arc::new(YahooChartAdapter::new(http)),
        CsvStore::new(&cli.data_dir),
        Arc::new(FixedDelay::from_secs(args.delay_secs)),
    );
    let outcome = runner.run(&symbols, period).await;

    info!(
        exchange = args.exchange.as_str(),
        year = args.year,
        fetched = outcome.fetched,
        skipped = outcome.skipped,
        empty = outcome.empty,
        failed = outcome.failed,
        "fetch complete"
    );
    Ok(())
}
