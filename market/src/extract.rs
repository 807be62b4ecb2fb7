use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::debug;

use corelib::error::{RrgError, RrgResult};
use corelib::models::{IndexKey, PriceFrame, PriceInput, PricePoint, PriceSeries};

/// Column names tried, in order, when reading prices out of a table.
///
/// If none matches, a table with exactly one column uses that column.
pub const PRICE_COLUMN_PRIORITY: [&str; 3] = ["Close", "Adj Close", "close"];

const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Resolve any accepted input shape into a canonical price series.
pub fn extract(input: PriceInput) -> RrgResult<PriceSeries> {
    match input {
        PriceInput::Series(series) => Ok(series),
        PriceInput::Points(points) => PriceSeries::new(points),
        PriceInput::Raw(prices) => PriceSeries::from_prices(&prices),
        PriceInput::Frame(frame) => extract_frame(&frame),
    }
}

fn extract_frame(frame: &PriceFrame) -> RrgResult<PriceSeries> {
    let col = resolve_price_column(&frame.columns)?;

    if frame.index.len() != frame.data.len() {
        return Err(RrgError::Schema(format!(
            "index has {} labels but table has {} rows",
            frame.index.len(),
            frame.data.len()
        )));
    }

    let mut points = Vec::with_capacity(frame.data.len());
    let mut dropped = 0usize;

    for (row_no, (key, row)) in frame.index.iter().zip(&frame.data).enumerate() {
        if row.len() != frame.columns.len() {
            return Err(RrgError::Schema(format!(
                "row {row_no} has {} cells, expected {}",
                row.len(),
                frame.columns.len()
            )));
        }

        // Missing cells are dropped, never filled.
        let Some(price) = row[col].filter(|p| !p.is_nan()) else {
            dropped += 1;
            continue;
        };

        points.push(PricePoint::new(index_to_ms(key)?, price));
    }

    debug!(
        column = %frame.columns[col],
        rows = frame.data.len(),
        dropped,
        "extracted price column"
    );

    PriceSeries::new(points)
}

/// Pick the price column index by [`PRICE_COLUMN_PRIORITY`].
pub fn resolve_price_column(columns: &[String]) -> RrgResult<usize> {
    for wanted in PRICE_COLUMN_PRIORITY {
        if let Some(i) = columns.iter().position(|c| c == wanted) {
            return Ok(i);
        }
    }

    if columns.len() == 1 {
        return Ok(0);
    }

    Err(RrgError::Schema(format!(
        "none of {PRICE_COLUMN_PRIORITY:?} in columns {columns:?}"
    )))
}

fn index_to_ms(key: &IndexKey) -> RrgResult<i64> {
    match key {
        IndexKey::Millis(ms) => Ok(*ms),
        IndexKey::Text(s) => parse_timestamp(s)
            .ok_or_else(|| RrgError::Schema(format!("unparsable index label '{s}'"))),
    }
}

/// Parses RFC 3339, naive date-times (taken as UTC) and plain `YYYY-MM-DD` dates.
fn parse_timestamp(s: &str) -> Option<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }

    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}
