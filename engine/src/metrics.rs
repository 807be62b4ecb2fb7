//! RS-Ratio and RS-Momentum.
//!
//! ## Pipeline
//!
//! ```text
//! rs[i]          = asset[i] / benchmark[i]
//! ema            = recursive EMA of rs, span = smoothing_period
//! rs_ratio[i]    = 100 * ema[i] / mean(ema)
//! rs_momentum[i] = 100 + 100 * (rs_ratio[i] - rs_ratio[i - roc]) / rs_ratio[i - roc]
//! ```
//!
//! `mean(ema)` is taken over the whole available sequence, which anchors the
//! ratio around 100 for the observed window.
//!
//! ## Undefined values
//! Nothing undefined reaches the output. Indices with a zero benchmark price
//! have no relative strength and are skipped. The first `roc` ratios have no
//! lagged value, and a zero lagged ratio has no rate of change; those points
//! are dropped. They are never replaced by zero or NaN.

use tracing::{debug, field, instrument};

use corelib::error::{RrgError, RrgResult};
use corelib::models::{RrgPoint, RrgSeries};
use market::AlignedPair;

use crate::config::RrgParams;
use crate::ema::ema;

/// Relative strength of asset vs. benchmark, keyed by timestamp.
///
/// Timestamps where the benchmark price is zero are left out.
pub fn relative_strength(pair: &AlignedPair) -> (Vec<i64>, Vec<f64>) {
    let mut ts = Vec::with_capacity(pair.len());
    let mut rs = Vec::with_capacity(pair.len());

    for ((&t, &a), &b) in pair.ts_ms().iter().zip(pair.asset()).zip(pair.benchmark()) {
        if b == 0.0 {
            continue;
        }
        ts.push(t);
        rs.push(a / b);
    }

    (ts, rs)
}

/// Normalize smoothed relative strength around 100.
///
/// Fails with `DegenerateSeries` if the mean is zero or not finite (for
/// example an asset priced at zero throughout).
pub fn rs_ratio(smoothed: &[f64]) -> RrgResult<Vec<f64>> {
    if smoothed.is_empty() {
        return Err(RrgError::InsufficientData(
            "no relative strength values to normalize".into(),
        ));
    }

    let mean = smoothed.iter().sum::<f64>() / smoothed.len() as f64;

    if mean == 0.0 || !mean.is_finite() {
        return Err(RrgError::DegenerateSeries(format!(
            "normalization baseline is {mean}"
        )));
    }

    Ok(smoothed.iter().map(|&e| 100.0 * e / mean).collect())
}

/// `roc`-lag percentage change of the ratio, centered at 100.
///
/// Output has the same length as `ratio`; `None` where the value is undefined.
pub fn rs_momentum(ratio: &[f64], roc: usize) -> Vec<Option<f64>> {
    ratio
        .iter()
        .enumerate()
        .map(|(i, &r)| {
            let lag = ratio[i.checked_sub(roc)?];
            if lag == 0.0 {
                return None;
            }
            Some(100.0 + 100.0 * (r - lag) / lag)
        })
        .collect()
}

/// Compute the RRG tail for one instrument.
///
/// Returns the last `min(tail_length, valid)` points, oldest first. When fewer
/// than `tail_length` valid points exist the series is returned anyway with
/// `truncated = true`. Zero valid points is `InsufficientData`.
#[instrument(
    target = "engine",
    skip(pair, params),
    fields(
        aligned_len = pair.len(),
        roc_period = params.roc_period(),
        valid_points = field::Empty
    )
)]
pub fn compute(instrument: &str, pair: &AlignedPair, params: &RrgParams) -> RrgResult<RrgSeries> {
    let (ts, rs) = relative_strength(pair);

    if rs.is_empty() {
        return Err(RrgError::InsufficientData(
            "benchmark price is zero at every aligned timestamp".into(),
        ));
    }

    let skipped = pair.len() - rs.len();
    if skipped > 0 {
        debug!(skipped, "skipped timestamps with zero benchmark price");
    }

    let ratio = rs_ratio(&ema(&rs, params.smoothing_period()))?;

    if params.roc_period() >= ratio.len() {
        return Err(RrgError::InsufficientData(format!(
            "{} relative strength points, roc_period {} needs at least {}",
            ratio.len(),
            params.roc_period(),
            params.roc_period() + 1
        )));
    }

    let momentum = rs_momentum(&ratio, params.roc_period());

    let mut valid: Vec<RrgPoint> = ts
        .iter()
        .zip(&ratio)
        .zip(&momentum)
        .filter_map(|((&ts_ms, &rs_ratio), &m)| {
            m.map(|rs_momentum| RrgPoint {
                ts_ms,
                rs_ratio,
                rs_momentum,
            })
        })
        .collect();

    tracing::Span::current().record("valid_points", valid.len());

    if valid.is_empty() {
        return Err(RrgError::InsufficientData(
            "no point has a defined RS-Momentum".into(),
        ));
    }

    let tail = params.tail_length();
    let truncated = valid.len() < tail;
    let points = valid.split_off(valid.len().saturating_sub(tail));

    if truncated {
        debug!(available = points.len(), tail, "tail shorter than requested");
    }

    Ok(RrgSeries {
        instrument: instrument.to_string(),
        points,
        truncated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use corelib::models::{PricePoint, PriceSeries};
    use market::align;

    fn pair(asset: &[f64], bench: &[f64]) -> AlignedPair {
        let a = PriceSeries::from_prices(asset).unwrap();
        let b = PriceSeries::from_prices(bench).unwrap();
        align(&a, &b).unwrap()
    }

    fn params(s: i64, r: i64, t: i64) -> RrgParams {
        RrgParams::new(s, r, t).unwrap()
    }

    #[test]
    fn zero_benchmark_prices_are_skipped_not_divided() {
        let p = pair(&[1.0, 2.0, 3.0], &[1.0, 0.0, 2.0]);

        let (ts, rs) = relative_strength(&p);

        assert_eq!(ts, vec![0, 2]);
        assert_eq!(rs, vec![1.0, 1.5]);
    }

    #[test]
    fn all_zero_benchmark_is_insufficient_data() {
        let p = pair(&[1.0, 2.0], &[0.0, 0.0]);

        let r = compute("X", &p, &params(2, 1, 1));
        assert!(matches!(r, Err(RrgError::InsufficientData(_))));
    }

    #[test]
    fn zero_asset_is_degenerate() {
        let p = pair(&[0.0; 20], &[5.0; 20]);

        let r = compute("X", &p, &params(5, 3, 4));
        assert!(matches!(r, Err(RrgError::DegenerateSeries(_))));
    }

    #[test]
    fn ratio_mean_is_one_hundred() {
        let smoothed = [0.9, 1.0, 1.1, 1.3, 0.7];
        let ratio = rs_ratio(&smoothed).unwrap();

        let mean = ratio.iter().sum::<f64>() / ratio.len() as f64;
        assert!((mean - 100.0).abs() < 1e-9);
    }

    #[test]
    fn momentum_is_exactly_100_for_unchanged_ratio() {
        let ratio = [98.0, 101.5, 98.0, 101.5, 97.0];
        let m = rs_momentum(&ratio, 2);

        assert_eq!(m[0], None);
        assert_eq!(m[1], None);
        assert_eq!(m[2], Some(100.0));
        assert_eq!(m[3], Some(100.0));
        assert_ne!(m[4], Some(100.0));
    }

    #[test]
    fn momentum_undefined_on_zero_lag() {
        let m = rs_momentum(&[0.0, 5.0], 1);
        assert_eq!(m, vec![None, None]);
    }

    #[test]
    fn roc_not_shorter_than_series_is_insufficient() {
        let p = pair(&[1.0; 8], &[1.0; 8]);

        let r = compute("X", &p, &params(10, 8, 5));
        assert!(matches!(r, Err(RrgError::InsufficientData(_))));

        let r = compute("X", &p, &params(10, 7, 5));
        assert_eq!(r.unwrap().points.len(), 1);
    }

    #[test]
    fn constant_equal_prices_sit_at_the_center() {
        let p = pair(&[10.0; 14], &[10.0; 14]);

        let s = compute("Flat", &p, &params(10, 5, 20)).unwrap();

        assert_eq!(s.points.len(), 9);
        assert!(s.truncated);
        for pt in &s.points {
            assert!((pt.rs_ratio - 100.0).abs() < 1e-9);
            assert!((pt.rs_momentum - 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn tail_keeps_most_recent_points_in_order() {
        let asset: Vec<f64> = (0..40).map(|i| 100.0 + i as f64).collect();
        let p = pair(&asset, &[100.0; 40]);

        let s = compute("Up", &p, &params(5, 5, 4)).unwrap();

        assert!(!s.truncated);
        let ts: Vec<i64> = s.points.iter().map(|p| p.ts_ms).collect();
        assert_eq!(ts, vec![36, 37, 38, 39]);
    }

    #[test]
    fn output_keeps_original_timestamps() {
        let a = PriceSeries::new(
            (0..10)
                .map(|i| PricePoint::new(1_000 * i, 10.0 + i as f64))
                .collect(),
        )
        .unwrap();
        let b = PriceSeries::new((0..10).map(|i| PricePoint::new(1_000 * i, 10.0)).collect()).unwrap();

        let s = compute("X", &align(&a, &b).unwrap(), &params(3, 2, 3)).unwrap();

        let ts: Vec<i64> = s.points.iter().map(|p| p.ts_ms).collect();
        assert_eq!(ts, vec![7_000, 8_000, 9_000]);
    }
}
