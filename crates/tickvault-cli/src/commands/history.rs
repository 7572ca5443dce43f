//! Single-ticker query: fetch one symbol's year and export it flat.
//!
//! Unlike the batch path this writes to `<data-dir>/<symbol>_<year>.csv`
//! with no year directory, and it neither consults the existence gate nor
//! paces itself — it is a one-shot lookup.

use std::sync::Arc;

use tickvault_core::{
    DataSource, HistoryRequest, HttpClient, Period, ReqwestHttpClient, Symbol,
    YahooChartAdapter,
};
use tickvault_store::CsvStore;
use tracing::{error, info};

use crate::cli::{Cli, HistoryArgs};
use crate::error::CliError;

pub async fn run(cli: &Cli, args: &HistoryArgs) -> Result<(), CliError> {
    let symbol = Symbol::parse(&args.symbol)?;
    let period = Period::new(args.year)?;

    let http: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::new());
    let source = YahooChartAdapter::new(http);

    let request = HistoryRequest::new(symbol.clone(), period);
    let series = source.daily_history(&request).await?;

    if series.is_empty() {
        error!(%symbol, year = args.year, "no data found for the requested year");
        return Ok(());
    }

    if let (Some(first), Some(last)) = (series.records().first(), series.records().last()) {
        info!(
            %symbol,
            rows = series.len(),
            first = %first.date,
            last = %last.date,
            "history retrieved"
        );
    }

    let store = CsvStore::new(&cli.data_dir);
    let path = store.export_single(symbol.as_str(), period.year(), &series.to_rows())?;
    info!(%symbol, path = %path.display(), "series exported");
    Ok(())
}
