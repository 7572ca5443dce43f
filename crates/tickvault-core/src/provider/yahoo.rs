//! Yahoo Finance chart adapter.
//!
//! Talks to the unauthenticated v8 chart endpoint at daily interval. The
//! endpoint answers with the series wrapped in a per-ticker grouping level
//! (`chart.result[]`, one entry per requested ticker even for a single
//! symbol); [`normalize_chart`] strips that level into the flat
//! [`PriceSeries`] schema so the rest of the system never sees it.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;
use time::OffsetDateTime;
use tracing::{debug, warn};

use crate::data_source::{DataSource, HistoryRequest, SourceError};
use crate::http_client::{HttpClient, HttpRequest, DEFAULT_TIMEOUT_MS};
use crate::{Period, PriceRecord, PriceSeries, ProviderId, Symbol};

const CHART_BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// Error code Yahoo uses for unknown or delisted symbols. Mapped to an empty
/// series rather than an error.
const NOT_FOUND_CODE: &str = "Not Found";

/// Daily-history adapter over the Yahoo chart endpoint.
#[derive(Clone)]
pub struct YahooChartAdapter {
    http: Arc<dyn HttpClient>,
    timeout_ms: u64,
}

impl YahooChartAdapter {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self {
            http,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    async fn fetch(&self, req: &HistoryRequest) -> Result<PriceSeries, SourceError> {
        let url = chart_url(&req.symbol, req.period);
        let request = HttpRequest::get(url).with_timeout_ms(self.timeout_ms);

        let response = self.http.execute(request).await.map_err(|error| {
            SourceError::unavailable(format!(
                "yahoo chart request for {} failed: {}",
                req.symbol,
                error.message()
            ))
        })?;

        if response.status == 429 {
            return Err(SourceError::rate_limited(format!(
                "yahoo throttled chart request for {}",
                req.symbol
            )));
        }

        let payload: ChartResponse = match serde_json::from_str(&response.body) {
            Ok(payload) => payload,
            // Unknown symbols come back as a 404 with a JSON error body, so a
            // body that does not even parse means the provider itself broke.
            Err(error) if response.is_success() => {
                return Err(SourceError::malformed_response(format!(
                    "yahoo chart payload for {} did not parse: {error}",
                    req.symbol
                )));
            }
            Err(_) => {
                return Err(SourceError::unavailable(format!(
                    "yahoo chart returned HTTP {} for {}",
                    response.status, req.symbol
                )));
            }
        };

        let series = normalize_chart(req.symbol.clone(), req.period, payload)?;
        debug!(
            symbol = %req.symbol,
            year = req.period.year(),
            rows = series.len(),
            "yahoo chart response normalized"
        );
        Ok(series)
    }
}

impl DataSource for YahooChartAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Yahoo
    }

    fn daily_history<'a>(
        &'a self,
        req: &'a HistoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<PriceSeries, SourceError>> + Send + 'a>> {
        Box::pin(self.fetch(req))
    }
}

fn chart_url(symbol: &Symbol, period: Period) -> String {
    let (start, end) = period.unix_window();
    format!(
        "{CHART_BASE_URL}/{}?period1={start}&period2={end}&interval=1d&includeAdjustedClose=true",
        urlencoding::encode(symbol.as_str())
    )
}

// Wire shapes for the chart payload. Everything the endpoint may omit is
// optional; missing pieces normalize to an empty series below.

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartEnvelope,
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteBlock>,
    #[serde(default)]
    adjclose: Vec<AdjCloseBlock>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteBlock {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

#[derive(Debug, Deserialize)]
struct AdjCloseBlock {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}

/// Collapses the per-ticker grouping level of a chart payload into a flat
/// series for the requested symbol.
fn normalize_chart(
    symbol: Symbol,
    period: Period,
    payload: ChartResponse,
) -> Result<PriceSeries, SourceError> {
    if let Some(error) = payload.chart.error {
        if error.code == NOT_FOUND_CODE {
            return Ok(PriceSeries::empty(symbol, period));
        }
        return Err(SourceError::unavailable(format!(
            "yahoo chart error for {symbol}: {} ({})",
            error.description.unwrap_or_default(),
            error.code
        )));
    }

    // One entry per requested ticker; a single-symbol request still arrives
    // wrapped, so take the sole entry and drop the grouping level.
    let Some(result) = payload
        .chart
        .result
        .and_then(|results| results.into_iter().next())
    else {
        return Ok(PriceSeries::empty(symbol, period));
    };

    if result.timestamp.is_empty() {
        return Ok(PriceSeries::empty(symbol, period));
    }

    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let adjclose = result
        .indicators
        .adjclose
        .into_iter()
        .next()
        .map(|block| block.adjclose)
        .unwrap_or_default();

    let mut records = Vec::with_capacity(result.timestamp.len());
    for (index, &ts) in result.timestamp.iter().enumerate() {
        let date = OffsetDateTime::from_unix_timestamp(ts)
            .map_err(|_| {
                SourceError::malformed_response(format!(
                    "yahoo chart timestamp {ts} out of range for {symbol}"
                ))
            })?
            .date();

        if !period.contains(date) {
            continue;
        }

        // Rows with missing OHLC entries are halted or unpriced days.
        let (Some(open), Some(high), Some(low), Some(close)) = (
            value_at(&quote.open, index),
            value_at(&quote.high, index),
            value_at(&quote.low, index),
            value_at(&quote.close, index),
        ) else {
            continue;
        };

        let volume = value_at(&quote.volume, index);
        let adj_close = value_at(&adjclose, index);

        match PriceRecord::new(date, open, high, low, close, adj_close, volume) {
            Ok(record) => records.push(record),
            Err(error) => {
                warn!(%symbol, %date, %error, "dropping inconsistent chart row");
            }
        }
    }

    Ok(PriceSeries::new(symbol, period, records))
}

fn value_at<T: Copy>(values: &[Option<T>], index: usize) -> Option<T> {
    values.get(index).copied().flatten()
}
