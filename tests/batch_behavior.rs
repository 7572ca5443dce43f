//! Behavior-driven tests for the batch pipeline.
//!
//! These verify HOW the orchestrator composes the existence gate, fetcher,
//! persister, and pacer: idempotent reruns, gate-skips that bypass the
//! pause, empty-data handling, and per-symbol failure containment.

use std::fs;
use std::sync::Arc;

use tickvault_core::{BatchRunner, Period, SourceError, Symbol};
use tickvault_store::CsvStore;
use tickvault_tests::{daily_record, CountingPacer, ScriptedSource};

fn symbol(name: &str) -> Symbol {
    Symbol::parse(name).expect("valid symbol")
}

fn period() -> Period {
    Period::new(2018).expect("valid year")
}

fn runner(
    source: &ScriptedSource,
    store: &CsvStore,
    pacer: &CountingPacer,
) -> BatchRunner {
    BatchRunner::new(
        Arc::new(source.clone()),
        store.clone(),
        Arc::new(pacer.clone()),
    )
}

// =============================================================================
// Idempotence and gate skipping
// =============================================================================

#[tokio::test]
async fn when_the_batch_runs_twice_the_second_run_fetches_nothing() {
    // Given: two symbols with data, archived by a first run
    let dir = tempfile::tempdir().expect("tempdir");
    let store = CsvStore::new(dir.path());
    let (aapl, msft) = (symbol("AAPL"), symbol("MSFT"));
    let source = ScriptedSource::new()
        .with_series(&aapl, vec![daily_record(2018, 1, 2, 170.0)])
        .with_series(&msft, vec![daily_record(2018, 1, 2, 85.0)]);
    let pacer = CountingPacer::new();
    let batch = runner(&source, &store, &pacer);
    let symbols = [aapl.clone(), msft.clone()];

    let first = batch.run(&symbols, period()).await;
    assert_eq!(first.fetched, 2);
    let archived = fs::read_to_string(store.series_path("AAPL", 2018)).expect("file exists");

    // When: the identical batch runs again
    let second = batch.run(&symbols, period()).await;

    // Then: every symbol is gate-skipped, the provider sees zero new calls,
    // and the files are byte-identical to the first run's output
    assert_eq!(second.skipped, 2);
    assert_eq!(second.fetched, 0);
    assert!(second.series.is_empty());
    assert_eq!(source.call_count(), 2, "no fetches on the second run");
    assert_eq!(
        fs::read_to_string(store.series_path("AAPL", 2018)).expect("file exists"),
        archived
    );
}

#[tokio::test]
async fn when_a_file_already_exists_the_fetcher_is_never_invoked_for_it() {
    // Given: an arbitrary file already sitting at the expected path
    let dir = tempfile::tempdir().expect("tempdir");
    let store = CsvStore::new(dir.path());
    let aapl = symbol("AAPL");
    let path = store.series_path("AAPL", 2018);
    fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    fs::write(&path, "stale bytes, not even csv").expect("seed file");

    let source = ScriptedSource::new().with_series(&aapl, vec![daily_record(2018, 1, 2, 170.0)]);
    let pacer = CountingPacer::new();

    // When: the batch runs over that symbol
    let outcome = runner(&source, &store, &pacer)
        .run(&[aapl], period())
        .await;

    // Then: the gate is content-blind — no fetch, no pause, file untouched
    assert_eq!(outcome.skipped, 1);
    assert!(source.calls().is_empty(), "fetcher must not be invoked");
    assert_eq!(pacer.pauses(), 0, "gate skips bypass the delay");
    assert_eq!(
        fs::read_to_string(&path).expect("file exists"),
        "stale bytes, not even csv"
    );
}

// =============================================================================
// Empty data and throttling
// =============================================================================

#[tokio::test]
async fn when_the_provider_returns_no_rows_nothing_is_written_or_recorded() {
    // Given: a symbol the provider has no data for (delisted year)
    let dir = tempfile::tempdir().expect("tempdir");
    let store = CsvStore::new(dir.path());
    let ghost = symbol("GHOST");
    let source = ScriptedSource::new().with_empty(&ghost);
    let pacer = CountingPacer::new();

    // When: the batch processes it
    let outcome = runner(&source, &store, &pacer)
        .run(&[ghost.clone()], period())
        .await;

    // Then: no file, no mapping entry, but the provider call still counts
    // toward throttling
    assert!(!store.series_path("GHOST", 2018).exists());
    assert!(outcome.series.is_empty());
    assert_eq!(outcome.empty, 1);
    assert_eq!(pacer.pauses(), 1, "empty fetches are still paced");
}

#[tokio::test]
async fn when_symbols_are_mixed_the_pacer_pauses_once_per_non_skipped_symbol() {
    // Given: one archived symbol, one with data, one empty, one failing
    let dir = tempfile::tempdir().expect("tempdir");
    let store = CsvStore::new(dir.path());
    let (done, ok, none, bad) = (
        symbol("DONE"),
        symbol("OK"),
        symbol("NONE"),
        symbol("BAD"),
    );
    let seed = store.series_path("DONE", 2018);
    fs::create_dir_all(seed.parent().expect("parent")).expect("mkdir");
    fs::write(&seed, "archived").expect("seed file");

    let source = ScriptedSource::new()
        .with_series(&ok, vec![daily_record(2018, 3, 1, 50.0)])
        .with_empty(&none)
        .with_failure(&bad, SourceError::unavailable("provider down"));
    let pacer = CountingPacer::new();

    // When: the batch runs all four
    let outcome = runner(&source, &store, &pacer)
        .run(&[done, ok, none, bad], period())
        .await;

    // Then: exactly three pauses — the archived symbol never throttles
    assert_eq!(pacer.pauses(), 3);
    assert_eq!(outcome.skipped, 1);
    assert_eq!(outcome.processed(), 3);
}

// =============================================================================
// Failure containment
// =============================================================================

#[tokio::test]
async fn when_one_symbol_fails_the_remaining_symbols_still_persist() {
    // Given: the middle symbol of three errors out at fetch time
    let dir = tempfile::tempdir().expect("tempdir");
    let store = CsvStore::new(dir.path());
    let (first, broken, last) = (symbol("AAA"), symbol("BBB"), symbol("CCC"));
    let source = ScriptedSource::new()
        .with_series(&first, vec![daily_record(2018, 2, 1, 20.0)])
        .with_failure(&broken, SourceError::unavailable("connection reset"))
        .with_series(&last, vec![daily_record(2018, 2, 1, 30.0)]);
    let pacer = CountingPacer::new();

    // When: the batch runs
    let outcome = runner(&source, &store, &pacer)
        .run(&[first.clone(), broken.clone(), last.clone()], period())
        .await;

    // Then: the failure is contained to its own symbol
    assert_eq!(outcome.fetched, 2);
    assert_eq!(outcome.failed, 1);
    assert!(store.series_path("AAA", 2018).exists());
    assert!(store.series_path("CCC", 2018).exists());
    assert!(!store.series_path("BBB", 2018).exists());
    assert!(outcome.series.contains_key(&first));
    assert!(outcome.series.contains_key(&last));
    assert!(!outcome.series.contains_key(&broken));
}

#[tokio::test]
async fn when_persisting_fails_the_batch_still_completes() {
    // Given: the year directory path is blocked by a regular file, so every
    // write for that year fails
    let dir = tempfile::tempdir().expect("tempdir");
    let store = CsvStore::new(dir.path());
    fs::write(dir.path().join("2018"), "in the way").expect("blocking file");

    let (one, two) = (symbol("ONE"), symbol("TWO"));
    let source = ScriptedSource::new()
        .with_series(&one, vec![daily_record(2018, 4, 2, 10.0)])
        .with_series(&two, vec![daily_record(2018, 4, 2, 11.0)]);
    let pacer = CountingPacer::new();

    // When: the batch runs
    let outcome = runner(&source, &store, &pacer)
        .run(&[one, two], period())
        .await;

    // Then: both write failures are contained per symbol; the loop finishes
    // and both symbols were still paced
    assert_eq!(outcome.failed, 2);
    assert!(outcome.series.is_empty());
    assert_eq!(pacer.pauses(), 2);
}

#[tokio::test]
async fn freshly_fetched_series_carry_their_records_in_the_mapping() {
    // Given: one symbol with a two-day series
    let dir = tempfile::tempdir().expect("tempdir");
    let store = CsvStore::new(dir.path());
    let aapl = symbol("AAPL");
    let records = vec![
        daily_record(2018, 1, 2, 170.0),
        daily_record(2018, 1, 3, 171.0),
    ];
    let source = ScriptedSource::new().with_series(&aapl, records.clone());
    let pacer = CountingPacer::new();

    // When: the batch runs
    let outcome = runner(&source, &store, &pacer)
        .run(&[aapl.clone()], period())
        .await;

    // Then: the mapping holds the fetched series verbatim
    let series = outcome.series.get(&aapl).expect("series recorded");
    assert_eq!(series.records(), records.as_slice());
}
