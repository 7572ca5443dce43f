use serde::{Deserialize, Serialize};
use tickvault_store::PriceRow;
use time::Date;

use crate::{Period, Symbol, ValidationError};

/// One daily OHLCV row. The trade date is the unique key within a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub date: Date,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adj_close: Option<f64>,
    pub volume: Option<u64>,
}

impl PriceRecord {
    pub fn new(
        date: Date,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        adj_close: Option<f64>,
        volume: Option<u64>,
    ) -> Result<Self, ValidationError> {
        validate_non_negative("open", open)?;
        validate_non_negative("high", high)?;
        validate_non_negative("low", low)?;
        validate_non_negative("close", close)?;
        validate_optional_non_negative("adj_close", adj_close)?;

        if high < low {
            return Err(ValidationError::InvalidRecordRange);
        }

        if open < low || open > high || close < low || close > high {
            return Err(ValidationError::InvalidRecordBounds);
        }

        Ok(Self {
            date,
            open,
            high,
            low,
            close,
            adj_close,
            volume,
        })
    }
}

/// Date-ascending daily history for one (symbol, period) pair.
///
/// Created in memory by a fetch, written at most once to the store, and
/// discarded at the end of the batch run. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub symbol: Symbol,
    pub period: Period,
    records: Vec<PriceRecord>,
}

impl PriceSeries {
    /// Builds a series, sorting records into date order.
    pub fn new(symbol: Symbol, period: Period, mut records: Vec<PriceRecord>) -> Self {
        records.sort_by_key(|record| record.date);
        Self {
            symbol,
            period,
            records,
        }
    }

    pub fn empty(symbol: Symbol, period: Period) -> Self {
        Self::new(symbol, period, Vec::new())
    }

    pub fn records(&self) -> &[PriceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Store-layer rows, in series order.
    pub fn to_rows(&self) -> Vec<PriceRow> {
        self.records
            .iter()
            .map(|record| PriceRow {
                date: record.date,
                open: record.open,
                high: record.high,
                low: record.low,
                close: record.close,
                adj_close: record.adj_close,
                volume: record.volume,
            })
            .collect()
    }
}

fn validate_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field });
    }
    Ok(())
}

fn validate_optional_non_negative(
    field: &'static str,
    value: Option<f64>,
) -> Result<(), ValidationError> {
    if let Some(value) = value {
        validate_non_negative(field, value)?;
    }
    Ok(())
}
