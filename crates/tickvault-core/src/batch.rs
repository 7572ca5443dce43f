//! Sequential batch pipeline.
//!
//! One pass over a symbol list, strictly in order, one provider call at a
//! time. Per symbol:
//!
//! ```text
//! CHECK_EXISTS -> (SKIP | FETCH -> (EMPTY | PERSIST -> RECORD)) -> DELAY -> NEXT
//! ```
//!
//! The existence gate makes reruns cheap and resumable: a symbol whose file
//! is already on disk is skipped without a provider call AND without the
//! inter-symbol pause. Every other symbol — fetched, empty, or failed — is
//! followed by exactly one pause, which throttles the provider regardless of
//! how the fetch went.
//!
//! No failure aborts the pass. Fetch and persist errors are both contained
//! at the symbol they belong to, logged, and counted.

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tickvault_store::CsvStore;
use tracing::{error, info};
use uuid::Uuid;

use crate::data_source::{DataSource, HistoryRequest};
use crate::{Period, PriceSeries, Symbol};

/// Pause applied between provider calls.
///
/// A trait seam so the pipeline's throttling behavior is observable in
/// tests; production uses [`FixedDelay`].
pub trait Pacer: Send + Sync {
    fn pause<'a>(&'a self) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>>;
}

/// Fixed-duration blocking pause. The whole process has a single logical
/// task, so suspending it wholesale is the intended throttle.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay {
    delay: Duration,
}

impl FixedDelay {
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub const fn from_secs(secs: u64) -> Self {
        Self::new(Duration::from_secs(secs))
    }
}

impl Pacer for FixedDelay {
    fn pause<'a>(&'a self) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        Box::pin(tokio::time::sleep(self.delay))
    }
}

/// Result of one batch pass.
///
/// `series` holds only the symbols freshly fetched with data this run;
/// symbols skipped by the existence gate are absent even though their files
/// are on disk from an earlier run.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub series: BTreeMap<Symbol, PriceSeries>,
    pub fetched: usize,
    pub skipped: usize,
    pub empty: usize,
    pub failed: usize,
}

impl BatchOutcome {
    /// Symbols that reached the provider this run.
    pub fn processed(&self) -> usize {
        self.fetched + self.empty + self.failed
    }
}

/// Drives the per-symbol fetch-and-persist pipeline.
pub struct BatchRunner {
    source: Arc<dyn DataSource>,
    store: CsvStore,
    pacer: Arc<dyn Pacer>,
}

impl BatchRunner {
    pub fn new(source: Arc<dyn DataSource>, store: CsvStore, pacer: Arc<dyn Pacer>) -> Self {
        Self {
            source,
            store,
            pacer,
        }
    }

    pub async fn run(&self, symbols: &[Symbol], period: Period) -> BatchOutcome {
        let run_id = Uuid::new_v4();
        info!(
            %run_id,
            provider = %self.source.id(),
            year = period.year(),
            symbols = symbols.len(),
            "starting batch run"
        );

        let mut outcome = BatchOutcome::default();

        for symbol in symbols {
            if self.store.contains(symbol.as_str(), period.year()) {
                info!(%symbol, year = period.year(), "series already on disk, skipping");
                outcome.skipped += 1;
                // Gate skips bypass the pause: nothing was asked of the
                // provider, so there is nothing to throttle.
                continue;
            }

            let request = HistoryRequest::new(symbol.clone(), period);
            match self.source.daily_history(&request).await {
                Ok(series) if series.is_empty() => {
                    info!(%symbol, year = period.year(), "provider returned no rows");
                    outcome.empty += 1;
                }
                Ok(series) => match self.store.persist(
                    symbol.as_str(),
                    period.year(),
                    &series.to_rows(),
                ) {
                    Ok(path) => {
                        info!(
                            %symbol,
                            rows = series.len(),
                            path = %path.display(),
                            "series persisted"
                        );
                        outcome.series.insert(symbol.clone(), series);
                        outcome.fetched += 1;
                    }
                    Err(err) => {
                        error!(%symbol, %err, "failed to persist series");
                        outcome.failed += 1;
                    }
                },
                Err(err) => {
                    error!(%symbol, %err, "failed to fetch series");
                    outcome.failed += 1;
                }
            }

            self.pacer.pause().await;
        }

        info!(
            %run_id,
            fetched = outcome.fetched,
            skipped = outcome.skipped,
            empty = outcome.empty,
            failed = outcome.failed,
            "batch run complete"
        );
        outcome
    }
}
