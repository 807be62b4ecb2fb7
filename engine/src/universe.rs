//! Multi-instrument computation with partial-failure reporting.
//!
//! One bad instrument never hides the others: per-instrument errors are
//! collected into [`RrgReport::failures`]. Only problems that make every
//! instrument meaningless abort the call (missing or unusable benchmark,
//! zero successful instruments).

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{info, instrument, warn};

use corelib::error::{InstrumentFailure, RrgError, RrgResult};
use corelib::models::{PriceInput, PriceSeries, RrgRow, RrgSeries};
use market::{align, extract};

use crate::config::RrgParams;
use crate::metrics::compute;

/// Below this many instruments a rotation graph says little.
pub const MIN_RECOMMENDED_INSTRUMENTS: usize = 3;

/// Result of one run over a universe of instruments.
///
/// `series` is the canonical output, keyed and ordered by instrument name.
/// [`RrgReport::rows`] is a flattened view of the same data.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RrgReport {
    pub series: BTreeMap<String, RrgSeries>,
    pub failures: Vec<InstrumentFailure>,
}

impl RrgReport {
    /// One row per `(instrument, point)`, by instrument then timestamp.
    pub fn rows(&self) -> impl Iterator<Item = RrgRow<'_>> + '_ {
        self.series.values().flat_map(|s| {
            s.points.iter().map(move |p| RrgRow {
                instrument: &s.instrument,
                ts_ms: p.ts_ms,
                rs_ratio: p.rs_ratio,
                rs_momentum: p.rs_momentum,
            })
        })
    }

    /// Some instruments failed but at least one succeeded.
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Extract, align and compute a single instrument against a prepared benchmark.
pub fn compute_instrument(
    instrument: &str,
    input: PriceInput,
    benchmark: &PriceSeries,
    params: &RrgParams,
) -> RrgResult<RrgSeries> {
    let asset = extract(input)?;
    let pair = align(&asset, benchmark)?;
    compute(instrument, &pair, params)
}

/// Compute RRG tails for every instrument in `inputs` except `benchmark`.
///
/// Errors:
/// - `MissingBenchmark` if `benchmark` is not a key of `inputs`
/// - any extraction error of the benchmark itself
/// - `NoValidInstruments` if no instrument produced output
#[instrument(
    target = "engine",
    skip(inputs, params),
    fields(
        instruments = inputs.len().saturating_sub(1),
        smoothing_period = params.smoothing_period(),
        roc_period = params.roc_period(),
        tail_length = params.tail_length()
    )
)]
pub fn compute_universe(
    mut inputs: BTreeMap<String, PriceInput>,
    benchmark: &str,
    params: &RrgParams,
) -> RrgResult<RrgReport> {
    let bench_input = inputs
        .remove(benchmark)
        .ok_or_else(|| RrgError::MissingBenchmark(benchmark.to_string()))?;

    let bench_series = extract(bench_input)?;

    if inputs.len() < MIN_RECOMMENDED_INSTRUMENTS {
        warn!(
            count = inputs.len(),
            "RRG works best with {MIN_RECOMMENDED_INSTRUMENTS} or more instruments"
        );
    }

    let mut report = RrgReport::default();

    for (name, input) in inputs {
        match compute_instrument(&name, input, &bench_series, params) {
            Ok(series) => {
                report.series.insert(name, series);
            }
            Err(e) => {
                warn!(instrument = %name, kind = e.kind(), error = %e, "instrument skipped");
                report.failures.push(InstrumentFailure::new(name, e));
            }
        }
    }

    if report.series.is_empty() {
        return Err(RrgError::NoValidInstruments {
            failures: report.failures,
        });
    }

    info!(
        ok = report.series.len(),
        failed = report.failures.len(),
        "computed RRG universe"
    );

    Ok(report)
}
