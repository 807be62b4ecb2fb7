/// Recursive (non-adjusted) exponential moving average.
///
/// ```text
/// alpha  = 2 / (span + 1)
/// ema[0] = x[0]
/// ema[i] = alpha * x[i] + (1 - alpha) * ema[i-1]
/// ```
///
/// The first output equals the first input; there is no warm-up bias
/// correction. Evaluation order is fixed so results are bit-reproducible.
pub fn ema(values: &[f64], span: usize) -> Vec<f64> {
    let Some(&first) = values.first() else {
        return Vec::new();
    };

    let alpha = 2.0 / (span.max(1) as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    out.push(first);

    for (i, &x) in values.iter().enumerate().skip(1) {
        let prev = out[i - 1];
        out.push(alpha * x + (1.0 - alpha) * prev);
    }

    out
}
