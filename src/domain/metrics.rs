//! Risk metrics derived from a completed equity curve.

use serde::{Deserialize, Serialize};

use crate::domain::returns::{mean, population_stddev};

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Stand-in volatility when the curve's returns have zero spread.
pub const SHARPE_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Metrics {
    pub sharpe: f64,
    /// Always <= 0; 0 when the curve never falls below its running peak.
    pub maxdd: f64,
}

impl Metrics {
    /// `None` for an empty curve.
    pub fn compute(equity_curve: &[f64], periods_per_year: f64) -> Option<Self> {
        if equity_curve.is_empty() {
            return None;
        }
        Some(Metrics {
            sharpe: compute_sharpe(equity_curve, periods_per_year),
            maxdd: compute_drawdown(equity_curve),
        })
    }

    /// Arithmetic mean of each field; zeroed when `metrics` is empty.
    pub fn average<'a, I>(metrics: I) -> Self
    where
        I: IntoIterator<Item = &'a Metrics>,
    {
        let mut count = 0usize;
        let mut sharpe = 0.0;
        let mut maxdd = 0.0;
        for m in metrics {
            count += 1;
            sharpe += m.sharpe;
            maxdd += m.maxdd;
        }
        if count == 0 {
            return Metrics::default();
        }
        Metrics {
            sharpe: sharpe / count as f64,
            maxdd: maxdd / count as f64,
        }
    }
}

/// Per-bar simple returns of the curve itself.
pub fn curve_returns(equity_curve: &[f64]) -> Vec<f64> {
    equity_curve
        .windows(2)
        .map(|w| if w[0] != 0.0 { w[1] / w[0] - 1.0 } else { 0.0 })
        .collect()
}

pub fn compute_sharpe(equity_curve: &[f64], periods_per_year: f64) -> f64 {
    let returns = curve_returns(equity_curve);
    if returns.is_empty() {
        return 0.0;
    }

    let stddev = population_stddev(&returns);
    let stddev = if stddev == 0.0 { SHARPE_EPSILON } else { stddev };
    (mean(&returns) / stddev) * periods_per_year.sqrt()
}

/// Minimum over the curve of value / running peak - 1, in one forward pass.
pub fn compute_drawdown(equity_curve: &[f64]) -> f64 {
    let Some(&first) = equity_curve.first() else {
        return 0.0;
    };

    let mut peak = first;
    let mut max_dd = 0.0_f64;
    for &value in equity_curve {
        peak = peak.max(value);
        if peak > 0.0 {
            max_dd = max_dd.min(value / peak - 1.0);
        }
    }
    max_dd
}
