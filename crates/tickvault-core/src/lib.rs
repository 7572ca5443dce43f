//! Core contracts for tickvault.
//!
//! This crate contains:
//! - Canonical domain models and validation
//! - Provider identifiers and the daily-history source contract
//! - The Yahoo chart adapter and the symbol-listing scrape
//! - The sequential batch pipeline that ties them to the CSV store

pub mod batch;
pub mod data_source;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod listing;
pub mod provider;
pub mod source;

pub use batch::{BatchOutcome, BatchRunner, FixedDelay, Pacer};
pub use data_source::{DataSource, HistoryRequest, SourceError, SourceErrorKind};
pub use domain::{Period, PriceRecord, PriceSeries, Symbol};
pub use error::{CoreError, ValidationError};
pub use http_client::{
    HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient, StaticHttpClient,
};
pub use listing::{ListingError, SymbolLister};
pub use provider::YahooChartAdapter;
pub use source::ProviderId;
pub use tickvault_store::{CsvStore, PriceRow, StoreError};
