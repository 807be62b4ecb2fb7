use serde::ser::{Serialize, SerializeStruct, Serializer};
use thiserror::Error;

pub type RrgResult<T> = Result<T, RrgError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RrgError {
    #[error("invalid parameter {name}: {value} (must be a positive integer)")]
    InvalidParameter { name: &'static str, value: i64 },

    #[error("no usable price column: {0}")]
    Schema(String),

    #[error("invalid price series: {0}")]
    InvalidSeries(String),

    #[error("benchmark '{0}' not present in input")]
    MissingBenchmark(String),

    #[error("insufficient data: {0}")]
    InsufficientData(String),

    #[error("degenerate series: {0}")]
    DegenerateSeries(String),

    #[error("price source error: {0}")]
    Source(String),

    #[error("no instrument produced RRG output ({} failures)", .failures.len())]
    NoValidInstruments { failures: Vec<InstrumentFailure> },
}

impl RrgError {
    /// Stable machine-readable code for the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            RrgError::InvalidParameter { .. } => "invalid_parameter",
            RrgError::Schema(_) => "schema",
            RrgError::InvalidSeries(_) => "invalid_series",
            RrgError::MissingBenchmark(_) => "missing_benchmark",
            RrgError::InsufficientData(_) => "insufficient_data",
            RrgError::DegenerateSeries(_) => "degenerate_series",
            RrgError::Source(_) => "source",
            RrgError::NoValidInstruments { .. } => "no_valid_instruments",
        }
    }

    /// Whether this error only concerns a single instrument.
    ///
    /// Per-instrument errors are collected into the report; anything else
    /// aborts the whole computation.
    pub fn is_per_instrument(&self) -> bool {
        matches!(
            self,
            RrgError::Schema(_)
                | RrgError::InvalidSeries(_)
                | RrgError::InsufficientData(_)
                | RrgError::DegenerateSeries(_)
                | RrgError::Source(_)
        )
    }
}

/// A per-instrument failure carried next to the successful series.
#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentFailure {
    pub instrument: String,
    pub error: RrgError,
}

impl InstrumentFailure {
    pub fn new(instrument: impl Into<String>, error: RrgError) -> Self {
        Self {
            instrument: instrument.into(),
            error,
        }
    }
}

impl Serialize for InstrumentFailure {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("InstrumentFailure", 3)?;
        s.serialize_field("instrument", &self.instrument)?;
        s.serialize_field("kind", self.error.kind())?;
        s.serialize_field("reason", &self.error.to_string())?;
        s.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_instrument_split_matches_propagation_policy() {
        assert!(RrgError::InsufficientData("x".into()).is_per_instrument());
        assert!(RrgError::DegenerateSeries("x".into()).is_per_instrument());
        assert!(RrgError::Schema("x".into()).is_per_instrument());

        assert!(!RrgError::MissingBenchmark("^NSEI".into()).is_per_instrument());
        assert!(
            !RrgError::InvalidParameter {
                name: "roc_period",
                value: 0
            }
            .is_per_instrument()
        );
        assert!(!RrgError::NoValidInstruments { failures: vec![] }.is_per_instrument());
    }

    #[test]
    fn failure_serializes_kind_and_reason() {
        let f = InstrumentFailure::new("IT", RrgError::InsufficientData("8 points".into()));
        let v = serde_json::to_value(&f).unwrap();

        assert_eq!(v["instrument"], "IT");
        assert_eq!(v["kind"], "insufficient_data");
        assert_eq!(v["reason"], "insufficient data: 8 points");
    }
}
