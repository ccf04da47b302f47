//! RSI (Relative Strength Index) indicator.
//!
//! Each point contributes a signed change from the previous close (0 for the first
//! point), split into a gain and a loss magnitude. Averages are simple means over
//! the trailing `n` changes:
//!
//! RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//!
//! - Warmup: while fewer than `n` points have been seen, RSI = 50.
//! - avg_loss == 0: rs is taken as 0, so RSI = 0.
//! - avg_gain == avg_loss == 0 (flat window): RSI = 50.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};

pub const DEFAULT_RSI_PERIOD: usize = 14;
pub const RSI_NEUTRAL: f64 = 50.0;

pub fn calculate_rsi(closes: &[f64], period: usize) -> IndicatorSeries {
    if period == 0 || closes.is_empty() {
        return IndicatorSeries::empty(IndicatorType::Rsi(period));
    }

    let mut gains: Vec<f64> = Vec::with_capacity(closes.len());
    let mut losses: Vec<f64> = Vec::with_capacity(closes.len());
    for (i, &close) in closes.iter().enumerate() {
        let change = if i == 0 { 0.0 } else { close - closes[i - 1] };
        gains.push(change.max(0.0));
        losses.push((-change).max(0.0));
    }

    let mut values = Vec::with_capacity(closes.len());
    let mut gain_sum = 0.0;
    let mut loss_sum = 0.0;
    // Nonzero entries inside the window; rolling sums alone can leave residue.
    let mut gain_count = 0usize;
    let mut loss_count = 0usize;

    for i in 0..closes.len() {
        gain_sum += gains[i];
        loss_sum += losses[i];
        gain_count += usize::from(gains[i] > 0.0);
        loss_count += usize::from(losses[i] > 0.0);

        if i >= period {
            let old = i - period;
            gain_sum -= gains[old];
            loss_sum -= losses[old];
            gain_count -= usize::from(gains[old] > 0.0);
            loss_count -= usize::from(losses[old] > 0.0);
        }

        if i + 1 < period {
            values.push(RSI_NEUTRAL);
            continue;
        }

        let rsi = if gain_count == 0 && loss_count == 0 {
            RSI_NEUTRAL
        } else if loss_count == 0 {
            0.0
        } else {
            let avg_gain = if gain_count == 0 {
                0.0
            } else {
                gain_sum.max(0.0) / period as f64
            };
            let avg_loss = loss_sum.max(0.0) / period as f64;
            let rs = if avg_loss > 0.0 { avg_gain / avg_loss } else { 0.0 };
            100.0 - (100.0 / (1.0 + rs))
        };
        values.push(rsi.clamp(0.0, 100.0));
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Rsi(period),
        values,
    }
}
