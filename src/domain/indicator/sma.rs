//! Simple Moving Average indicator.
//!
//! SMA(n)[i] = mean of the last min(i+1, n) closes. The window grows until it is
//! full, then rolls. A running sum over a bounded buffer keeps this O(len).

use std::collections::VecDeque;

use crate::domain::indicator::{IndicatorSeries, IndicatorType};

pub fn calculate_sma(closes: &[f64], period: usize) -> IndicatorSeries {
    if period == 0 || closes.is_empty() {
        return IndicatorSeries::empty(IndicatorType::Sma(period));
    }

    let mut values = Vec::with_capacity(closes.len());
    let mut window: VecDeque<f64> = VecDeque::with_capacity(period.min(closes.len()) + 1);
    let mut sum = 0.0;

    for &close in closes {
        window.push_back(close);
        sum += close;
        if window.len() > period {
            if let Some(oldest) = window.pop_front() {
                sum -= oldest;
            }
        }
        values.push(sum / window.len() as f64);
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Sma(period),
        values,
    }
}
