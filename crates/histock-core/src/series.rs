//! Daily price series codec.
//!
//! The provider returns a market's full history as delimited text with
//! the header `Date,Open,High,Low,Close,Adj Close,Volume`. This module
//! decodes that artifact into typed [`PriceRecord`]s, rejecting anything
//! that does not look like a price series (an error payload staged by
//! mistake must fail here, not end up in storage).

use std::io::Read;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::format_description::well_known::Iso8601;
use time::Date;

/// Column header the provider contract guarantees, in order.
pub const SERIES_HEADER: [&str; 7] =
    ["Date", "Open", "High", "Low", "Close", "Adj Close", "Volume"];

/// One trading day for one market.
///
/// Field order matters: the JSON object served to clients carries the
/// keys in exactly this order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adj_close: f64,
    pub volume: i64,
}

/// Errors decoding a raw series artifact.
#[derive(Debug, Error)]
pub enum SeriesError {
    #[error("series header mismatch: expected {expected:?}, found {found:?}")]
    HeaderMismatch { expected: Vec<String>, found: Vec<String> },

    #[error("invalid date {value:?} in series row")]
    InvalidDate { value: String },

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// Provider-side row shape; renamed fields follow the CSV header.
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Open")]
    open: f64,
    #[serde(rename = "High")]
    high: f64,
    #[serde(rename = "Low")]
    low: f64,
    #[serde(rename = "Close")]
    close: f64,
    #[serde(rename = "Adj Close")]
    adj_close: f64,
    #[serde(rename = "Volume")]
    volume: i64,
}

/// Decode a raw series artifact into price records, preserving row order.
pub fn parse_series(input: impl Read) -> Result<Vec<PriceRecord>, SeriesError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(input);

    let headers = reader.headers()?.clone();
    if headers.iter().ne(SERIES_HEADER) {
        return Err(SeriesError::HeaderMismatch {
            expected: SERIES_HEADER.iter().map(|h| (*h).to_owned()).collect(),
            found: headers.iter().map(str::to_owned).collect(),
        });
    }

    let mut records = Vec::new();
    for row in reader.deserialize::<RawRow>() {
        let row = row?;
        if Date::parse(&row.date, &Iso8601::DEFAULT).is_err() {
            return Err(SeriesError::InvalidDate { value: row.date });
        }
        records.push(PriceRecord {
            date: row.date,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            adj_close: row.adj_close,
            volume: row.volume,
        });
    }

    Ok(records)
}
