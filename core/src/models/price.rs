use serde::{Deserialize, Serialize};

use crate::error::RrgError;

/// A single observation: millisecond timestamp and price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub ts_ms: i64,
    pub price: f64,
}

impl PricePoint {
    pub fn new(ts_ms: i64, price: f64) -> Self {
        Self { ts_ms, price }
    }
}

/// Ordered price history of one instrument.
///
/// Invariants (checked on construction):
/// - timestamps strictly increasing (no duplicates)
/// - prices finite and non-negative
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PricePoint>", into = "Vec<PricePoint>")]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(points: Vec<PricePoint>) -> Result<Self, RrgError> {
        for (i, p) in points.iter().enumerate() {
            if !p.price.is_finite() || p.price < 0.0 {
                return Err(RrgError::InvalidSeries(format!(
                    "price {} at ts {} is not a finite non-negative number",
                    p.price, p.ts_ms
                )));
            }

            if i > 0 && points[i - 1].ts_ms >= p.ts_ms {
                return Err(RrgError::InvalidSeries(format!(
                    "timestamps not strictly increasing at index {i} ({} >= {})",
                    points[i - 1].ts_ms,
                    p.ts_ms
                )));
            }
        }

        Ok(Self { points })
    }

    /// Builds a series from bare prices, using the position as timestamp.
    pub fn from_prices(prices: &[f64]) -> Result<Self, RrgError> {
        let points = prices
            .iter()
            .enumerate()
            .map(|(i, &price)| PricePoint::new(i as i64, price))
            .collect();

        Self::new(points)
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl TryFrom<Vec<PricePoint>> for PriceSeries {
    type Error = RrgError;

    fn try_from(points: Vec<PricePoint>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<PriceSeries> for Vec<PricePoint> {
    fn from(series: PriceSeries) -> Self {
        series.points
    }
}

/// Row label of a [`PriceFrame`]: epoch milliseconds or a date string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IndexKey {
    Millis(i64),
    Text(String),
}

/// Labeled table with one or more value columns.
///
/// Layout matches the pandas "split" orientation:
///
/// ```text
/// { "columns": ["Open", "Close"], "index": ["2024-01-02", ...], "data": [[1.0, 2.0], ...] }
/// ```
///
/// `null` cells are missing values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceFrame {
    pub columns: Vec<String>,
    pub index: Vec<IndexKey>,
    pub data: Vec<Vec<Option<f64>>>,
}

/// Any of the input shapes accepted at the data boundary.
///
/// Shape is resolved exactly once, by extraction, into a [`PriceSeries`].
/// Deserialized point lists land in `Points` unvalidated, so a broken file
/// surfaces as `InvalidSeries` from extraction rather than as a parse error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriceInput {
    /// Bare prices; the position is used as timestamp.
    Raw(Vec<f64>),
    /// Timestamped points, checked when extracted.
    Points(Vec<PricePoint>),
    Frame(PriceFrame),
    /// An already validated series. Only built in code; JSON point lists
    /// deserialize as `Points`.
    Series(PriceSeries),
}

impl From<PriceSeries> for PriceInput {
    fn from(series: PriceSeries) -> Self {
        PriceInput::Series(series)
    }
}

impl From<PriceFrame> for PriceInput {
    fn from(frame: PriceFrame) -> Self {
        PriceInput::Frame(frame)
    }
}
