//! Symbol listing scrape.
//!
//! Constituent lists live on public web pages as HTML tables. The lister
//! fetches one page, walks its tables in document order, and pulls the
//! column headed exactly `Symbol` out of the first table that has one.
//!
//! The public entry point never fails hard: a dead URL, a page with no
//! tables, or a page whose tables lack a symbol column all log the problem
//! and yield an empty list, which callers treat as "nothing to process".
//! No retries, no pagination, no caching of the page.

use std::sync::Arc;

use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::http_client::{HttpClient, HttpRequest};
use crate::Symbol;

/// Header cell text that marks the symbol column. Exact, case-sensitive.
const SYMBOL_HEADER: &str = "Symbol";

/// Failures the lister reports (and then swallows into an empty list).
#[derive(Debug, Error)]
pub enum ListingError {
    #[error("listing fetch failed: {0}")]
    Transport(#[from] crate::HttpError),

    #[error("listing source returned HTTP {status}")]
    BadStatus { status: u16 },

    #[error("no table with a '{SYMBOL_HEADER}' column found at the source")]
    NoSymbolColumn,
}

/// Scrapes ticker symbols from an HTML table on a web page.
#[derive(Clone)]
pub struct SymbolLister {
    http: Arc<dyn HttpClient>,
}

impl SymbolLister {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self { http }
    }

    /// Fetches the listing and returns the cleaned symbols in page order.
    ///
    /// `source_label` is used only for reporting. Any failure is logged and
    /// collapses to an empty list; an empty result means "no symbols to
    /// process", never a hard stop.
    pub async fn list_symbols(&self, source_label: &str, source_url: &str) -> Vec<Symbol> {
        match self.fetch_symbols(source_url).await {
            Ok(symbols) => {
                info!(
                    source = source_label,
                    count = symbols.len(),
                    "fetched symbol listing"
                );
                symbols
            }
            Err(err) => {
                error!(
                    source = source_label,
                    url = source_url,
                    %err,
                    "failed to fetch symbol listing"
                );
                Vec::new()
            }
        }
    }

    /// Fallible inner fetch, exposed so callers and tests can distinguish
    /// failure modes.
    pub async fn fetch_symbols(&self, url: &str) -> Result<Vec<Symbol>, ListingError> {
        let response = self
            .http
            .execute(HttpRequest::get(url).with_header("accept", "text/html"))
            .await?;

        if !response.is_success() {
            return Err(ListingError::BadStatus {
                status: response.status,
            });
        }

        extract_symbol_column(&response.body).ok_or(ListingError::NoSymbolColumn)
    }
}

/// Scans tables in document order and returns the symbol column of the first
/// table whose header row has a cell reading exactly `Symbol`.
///
/// Synchronous on purpose: `scraper::Html` is not `Send`, so the document
/// must not live across an await point.
fn extract_symbol_column(html: &str) -> Option<Vec<Symbol>> {
    let document = Html::parse_document(html);
    let tables = Selector::parse("table").expect("static selector");
    let rows = Selector::parse("tr").expect("static selector");
    let cells = Selector::parse("th, td").expect("static selector");

    for table in document.select(&tables) {
        let mut table_rows = table.select(&rows);
        let Some(header_row) = table_rows.next() else {
            continue;
        };

        let Some(column) = header_row
            .select(&cells)
            .position(|cell| cell_text(cell) == SYMBOL_HEADER)
        else {
            continue;
        };

        let mut symbols = Vec::new();
        for row in table_rows {
            let Some(cell) = row.select(&cells).nth(column) else {
                continue;
            };
            let raw = cell_text(cell);
            match Symbol::parse(&raw) {
                Ok(symbol) => symbols.push(symbol),
                Err(err) => {
                    warn!(value = raw.as_str(), %err, "skipping unparsable symbol cell");
                }
            }
        }
        return Some(symbols);
    }

    None
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn takes_the_first_table_with_a_symbol_column() {
        let html = r#"
            <table><tr><th>Rank</th><th>Name</th></tr>
                   <tr><td>1</td><td>Apple</td></tr></table>
            <table><tr><th>Symbol</th><th>Security</th></tr>
                   <tr><td> MMM </td><td>3M</td></tr>
                   <tr><td>AOS</td><td>A. O. Smith</td></tr></table>
            <table><tr><th>Symbol</th></tr><tr><td>ZZZ</td></tr></table>
        "#;

        let symbols = extract_symbol_column(html).expect("column found");
        let names: Vec<&str> = symbols.iter().map(Symbol::as_str).collect();
        assert_eq!(names, vec!["MMM", "AOS"]);
    }

    #[test]
    fn header_match_is_case_sensitive() {
        let html = r#"
            <table><tr><th>SYMBOL</th></tr><tr><td>MMM</td></tr></table>
        "#;
        assert!(extract_symbol_column(html).is_none());
    }

    #[test]
    fn symbol_column_position_is_respected() {
        let html = r#"
            <table><tr><th>Security</th><th>Symbol</th></tr>
                   <tr><td>3M</td><td>MMM</td></tr></table>
        "#;

        let symbols = extract_symbol_column(html).expect("column found");
        assert_eq!(symbols[0].as_str(), "MMM");
    }

    #[test]
    fn nested_markup_inside_cells_is_flattened() {
        let html = r#"
            <table><tr><th>Symbol</th></tr>
                   <tr><td><a href="/quote/MMM">MMM</a></td></tr></table>
        "#;

        let symbols = extract_symbol_column(html).expect("column found");
        assert_eq!(symbols[0].as_str(), "MMM");
    }

    #[test]
    fn unparsable_cells_are_skipped() {
        let html = r#"
            <table><tr><th>Symbol</th></tr>
                   <tr><td>MMM</td></tr>
                   <tr><td>  </td></tr>
                   <tr><td>AOS</td></tr></table>
        "#;

        let symbols = extract_symbol_column(html).expect("column found");
        assert_eq!(symbols.len(), 2);
    }

    #[test]
    fn page_without_tables_yields_none() {
        assert!(extract_symbol_column("<p>nothing here</p>").is_none());
    }
}
