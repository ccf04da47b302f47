//! Exponential Moving Average indicator.
//!
//! k = 2/(n+1), seeded with the first close, then EMA[i] = (C[i] - EMA[i-1])*k + EMA[i-1].
//! Every point is defined; there is no invalid warm-up region.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};

pub fn calculate_ema(closes: &[f64], period: usize) -> IndicatorSeries {
    if period == 0 || closes.is_empty() {
        return IndicatorSeries::empty(IndicatorType::Ema(period));
    }

    let mut values = Vec::with_capacity(closes.len());
    let k = 2.0 / (period as f64 + 1.0);
    let mut ema = closes[0];
    values.push(ema);

    for &close in &closes[1..] {
        ema = (close - ema) * k + ema;
        values.push(ema);
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Ema(period),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn ema_seed_is_first_close() {
        let series = calculate_ema(&[10.0, 20.0, 30.0], 3);
        assert_relative_eq!(series.values[0], 10.0);
    }

    #[test]
    fn ema_recursive_calculation() {
        let series = calculate_ema(&[10.0, 20.0, 30.0, 40.0], 3);

        let k = 2.0 / 4.0;
        let e1 = (20.0 - 10.0) * k + 10.0;
        let e2 = (30.0 - e1) * k + e1;
        let e3 = (40.0 - e2) * k + e2;

        assert_relative_eq!(series.values[1], e1);
        assert_relative_eq!(series.values[2], e2);
        assert_relative_eq!(series.values[3], e3);
    }

    #[test]
    fn ema_period_1_tracks_closes() {
        let series = calculate_ema(&[10.0, 20.0, 30.0], 1);
        assert_relative_eq!(series.values[1], 20.0);
        assert_relative_eq!(series.values[2], 30.0);
    }

    #[test]
    fn ema_equal_prices() {
        let series = calculate_ema(&[100.0; 8], 5);
        for v in &series.values {
            assert_relative_eq!(*v, 100.0);
        }
    }

    #[test]
    fn ema_single_point() {
        assert_eq!(calculate_ema(&[7.5], 50).values, vec![7.5]);
    }

    #[test]
    fn ema_empty_closes() {
        assert!(calculate_ema(&[], 3).values.is_empty());
    }

    #[test]
    fn ema_period_0() {
        assert!(calculate_ema(&[10.0, 20.0], 0).values.is_empty());
    }

    #[test]
    fn ema_indicator_type() {
        assert_eq!(
            calculate_ema(&[1.0], 50).indicator_type,
            IndicatorType::Ema(50)
        );
    }
}
