//! # Tickvault Store
//!
//! Filesystem-backed CSV archive for daily price history.
//!
//! One file per (symbol, year) pair. The batch pipeline writes into
//! year-partitioned directories; the single-ticker export path writes a flat
//! file next to them:
//!
//! | Artifact | Path |
//! |----------|------|
//! | Batch series | `<base>/<year>/<symbol>_<year>.csv` |
//! | Single-ticker export | `<base>/<symbol>_<year>.csv` |
//!
//! Presence of the batch artifact is the store's idempotence signal: callers
//! consult [`CsvStore::contains`] before fetching, and that check is
//! content-blind on purpose — a file at the expected path means the pair is
//! done, regardless of what the file holds. [`CsvStore::persist`] itself is
//! not idempotence-aware and truncates unconditionally.

mod error;

use std::fs;
use std::path::{Path, PathBuf};

use time::Date;

pub use error::StoreError;

/// Default archive directory, relative to the working directory.
pub const DEFAULT_BASE_DIR: &str = "data";

/// One persisted daily row. Field order matches the on-disk column order.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRow {
    pub date: Date,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adj_close: Option<f64>,
    pub volume: Option<u64>,
}

/// CSV header written ahead of every series. Date is always the first column.
const HEADER: [&str; 7] = ["Date", "Open", "High", "Low", "Close", "Adj Close", "Volume"];

/// Handle on the on-disk CSV archive.
#[derive(Debug, Clone)]
pub struct CsvStore {
    base: PathBuf,
}

impl CsvStore {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Opens the store at the default `data/` directory.
    pub fn open_default() -> Self {
        Self::new(DEFAULT_BASE_DIR)
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Canonical year-partitioned path for a batch series.
    pub fn series_path(&self, symbol: &str, year: i32) -> PathBuf {
        self.base
            .join(year.to_string())
            .join(format!("{symbol}_{year}.csv"))
    }

    /// Flat path used by the single-ticker export. Kept distinct from
    /// [`series_path`](Self::series_path); the two layouts are both part of
    /// the store's contract.
    pub fn export_path(&self, symbol: &str, year: i32) -> PathBuf {
        self.base.join(format!("{symbol}_{year}.csv"))
    }

    /// Existence gate: whether a batch artifact is already present for the
    /// pair. Pure path check, no content validation and no freshness concept.
    pub fn contains(&self, symbol: &str, year: i32) -> bool {
        self.series_path(symbol, year).exists()
    }

    /// Writes a full series to its canonical path, creating the year
    /// directory as needed and truncating any existing file.
    ///
    /// There is no partial-write recovery: a failed write surfaces as
    /// [`StoreError`] and may leave a partial file behind.
    pub fn persist(&self, symbol: &str, year: i32, rows: &[PriceRow]) -> Result<PathBuf, StoreError> {
        let path = self.series_path(symbol, year);
        self.write_rows(&path, rows)?;
        Ok(path)
    }

    /// Writes a series to the flat single-ticker path.
    pub fn export_single(
        &self,
        symbol: &str,
        year: i32,
        rows: &[PriceRow],
    ) -> Result<PathBuf, StoreError> {
        let path = self.export_path(symbol, year);
        self.write_rows(&path, rows)?;
        Ok(path)
    }

    fn write_rows(&self, path: &Path, rows: &[PriceRow]) -> Result<(), StoreError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(HEADER)?;

        for row in rows {
            writer.write_record([
                row.date.to_string(),
                format_price(row.open),
                format_price(row.high),
                format_price(row.low),
                format_price(row.close),
                row.adj_close.map(format_price).unwrap_or_default(),
                row.volume.map(|v| v.to_string()).unwrap_or_default(),
            ])?;
        }

        writer.flush()?;
        Ok(())
    }
}

fn format_price(value: f64) -> String {
    value.to_string()
}
