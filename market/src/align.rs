use std::cmp::Ordering;

use tracing::debug;

use corelib::error::{RrgError, RrgResult};
use corelib::models::PriceSeries;

/// Asset and benchmark prices restricted to their common timestamps.
///
/// Invariant: all three vectors have the same length, and `asset[i]` and
/// `benchmark[i]` were both observed at `ts_ms[i]`. Fields are private so the
/// invariant holds for the lifetime of the value.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedPair {
    ts_ms: Vec<i64>,
    asset: Vec<f64>,
    benchmark: Vec<f64>,
}

impl AlignedPair {
    pub fn ts_ms(&self) -> &[i64] {
        &self.ts_ms
    }

    pub fn asset(&self) -> &[f64] {
        &self.asset
    }

    pub fn benchmark(&self) -> &[f64] {
        &self.benchmark
    }

    pub fn len(&self) -> usize {
        self.ts_ms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ts_ms.is_empty()
    }
}

/// Inner-join two series on timestamp.
///
/// Only timestamps present in both series survive; nothing is forward-filled,
/// so every relative-strength value downstream comes from two real
/// observations. Both inputs are strictly increasing, which makes this a
/// single linear merge.
///
/// Fails with `InsufficientData` if either input is empty or the two series
/// share no timestamp.
pub fn align(asset: &PriceSeries, benchmark: &PriceSeries) -> RrgResult<AlignedPair> {
    if asset.is_empty() || benchmark.is_empty() {
        return Err(RrgError::InsufficientData(format!(
            "cannot align empty series (asset={}, benchmark={})",
            asset.len(),
            benchmark.len()
        )));
    }

    let a = asset.points();
    let b = benchmark.points();
    let cap = a.len().min(b.len());

    let mut out = AlignedPair {
        ts_ms: Vec::with_capacity(cap),
        asset: Vec::with_capacity(cap),
        benchmark: Vec::with_capacity(cap),
    };

    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].ts_ms.cmp(&b[j].ts_ms) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                out.ts_ms.push(a[i].ts_ms);
                out.asset.push(a[i].price);
                out.benchmark.push(b[j].price);
                i += 1;
                j += 1;
            }
        }
    }

    if out.is_empty() {
        return Err(RrgError::InsufficientData(
            "asset and benchmark share no timestamps".into(),
        ));
    }

    debug!(
        asset_len = a.len(),
        benchmark_len = b.len(),
        aligned_len = out.len(),
        "aligned series"
    );

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use corelib::models::PricePoint;

    fn series(pts: &[(i64, f64)]) -> PriceSeries {
        PriceSeries::new(pts.iter().map(|&(t, p)| PricePoint::new(t, p)).collect()).unwrap()
    }

    #[test]
    fn keeps_only_common_timestamps_in_order() {
        let a = series(&[(1, 10.0), (2, 11.0), (4, 12.0), (5, 13.0)]);
        let b = series(&[(2, 20.0), (3, 21.0), (5, 22.0), (6, 23.0)]);

        let pair = align(&a, &b).unwrap();

        assert_eq!(pair.ts_ms(), &[2, 5]);
        assert_eq!(pair.asset(), &[11.0, 13.0]);
        assert_eq!(pair.benchmark(), &[20.0, 22.0]);
    }

    #[test]
    fn empty_input_is_insufficient_data() {
        let a = series(&[]);
        let b = series(&[(1, 1.0)]);

        assert!(matches!(align(&a, &b), Err(RrgError::InsufficientData(_))));
        assert!(matches!(align(&b, &a), Err(RrgError::InsufficientData(_))));
    }

    #[test]
    fn disjoint_series_are_insufficient_data() {
        let a = series(&[(1, 1.0), (3, 1.0)]);
        let b = series(&[(2, 1.0), (4, 1.0)]);

        assert!(matches!(align(&a, &b), Err(RrgError::InsufficientData(_))));
    }
}
