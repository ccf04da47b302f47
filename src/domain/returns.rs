//! Simple-return and summary-statistic helpers shared by features, strategies and
//! metrics.
//!
//! A prior price of exactly zero is replaced with 1 as the denominator. The result
//! is numerically meaningless for such bars but keeps every computation total.

/// (current - prior) / prior, with a zero prior treated as 1.
pub fn simple_return(current: f64, prior: f64) -> f64 {
    let denom = if prior == 0.0 { 1.0 } else { prior };
    (current - prior) / denom
}

/// k-bar simple returns, one per input point. Indices before `k` are 0.
pub fn lagged_returns(closes: &[f64], k: usize) -> Vec<f64> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            if k == 0 || i < k {
                0.0
            } else {
                simple_return(close, closes[i - k])
            }
        })
        .collect()
}

/// Arithmetic mean; 0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation; 0 for an empty slice.
pub fn population_stddev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}
