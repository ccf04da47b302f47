//! Single-asset backtest engine.
//!
//! Replays a strategy bar-by-bar over a close series holding a binary position:
//! equity[i] = equity[i-1] * (1 + exposure * r[i]), with equity[0] = 1.0.
//! No leverage, no shorting, no costs.

use serde::Deserialize;

use crate::domain::error::EngineError;
use crate::domain::metrics::Metrics;
use crate::domain::position::Position;
use crate::domain::returns::simple_return;
use crate::domain::strategy::{Strategy, StrategyKind, StrategyParams};

/// Backtest request. Only the first symbol is simulated.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BacktestConfig {
    #[serde(default)]
    pub symbols: Vec<String>,
    #[serde(default)]
    pub strategy: StrategyKind,
    #[serde(default)]
    pub params: StrategyParams,
    /// Accepted for compatibility; the history provider decides the date range.
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
}

impl BacktestConfig {
    pub fn primary_symbol(&self) -> Option<&str> {
        self.symbols
            .first()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }

    pub fn build_strategy(&self) -> Result<Strategy, EngineError> {
        Strategy::from_params(self.strategy, &self.params)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub equity_curve: Vec<f64>,
    /// Position held over each bar; bar 0 never trades.
    pub positions: Vec<Position>,
    /// `None` when there was nothing to simulate.
    pub metrics: Option<Metrics>,
}

impl BacktestResult {
    pub fn empty() -> Self {
        Self {
            equity_curve: Vec::new(),
            positions: Vec::new(),
            metrics: None,
        }
    }

    /// Position after the last bar, undefined until at least one bar has traded.
    pub fn final_position(&self) -> Option<Position> {
        if self.positions.len() < 2 {
            return None;
        }
        self.positions.last().copied()
    }

    pub fn final_equity(&self) -> Option<f64> {
        self.equity_curve.last().copied()
    }
}

pub fn run_backtest(closes: &[f64], strategy: &Strategy, periods_per_year: f64) -> BacktestResult {
    if closes.is_empty() {
        return BacktestResult::empty();
    }

    let positions = strategy.signals(closes);
    let mut equity_curve = Vec::with_capacity(closes.len());
    equity_curve.push(1.0);

    for i in 1..closes.len() {
        let r = simple_return(closes[i], closes[i - 1]);
        let prev = equity_curve[i - 1];
        equity_curve.push(prev * (1.0 + positions[i].exposure() * r));
    }

    let metrics = Metrics::compute(&equity_curve, periods_per_year);
    BacktestResult {
        equity_curve,
        positions,
        metrics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::metrics::TRADING_DAYS_PER_YEAR;
    use approx::assert_relative_eq;
    use proptest::prelude::*;
    use crate::domain::strategy::Strategy;
    use serde_json::json;

    fn rising(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + i as f64).collect()
    }

    #[test]
    fn empty_closes_give_empty_result() {
        let s = Strategy::ma_crossover(5, 20).unwrap();
        let result = run_backtest(&[], &s, TRADING_DAYS_PER_YEAR);
        assert_eq!(result, BacktestResult::empty());
        assert_eq!(result.final_position(), None);
    }

    #[test]
    fn single_close() {
        let s = Strategy::ma_crossover(5, 20).unwrap();
        let result = run_backtest(&[100.0], &s, TRADING_DAYS_PER_YEAR);
        assert_eq!(result.equity_curve, vec![1.0]);
        assert_eq!(result.final_position(), None);
        assert_eq!(result.metrics, Some(Metrics::default()));
    }

    #[test]
    fn rising_prices_ma_crossover() {
        let closes = rising(50);
        let s = Strategy::ma_crossover(5, 20).unwrap();
        let result = run_backtest(&closes, &s, TRADING_DAYS_PER_YEAR);

        assert_eq!(result.equity_curve.len(), 50);
        assert_eq!(result.equity_curve[0], 1.0);
        assert_eq!(result.final_position(), Some(Position::Long));
        assert!(result.final_equity().unwrap() > 1.0);
        // Long on every bar from 1: the curve tracks the price ratio.
        assert_relative_eq!(result.final_equity().unwrap(), 149.0 / 100.0, epsilon = 1e-9);
        assert_eq!(result.metrics.unwrap().maxdd, 0.0);
    }

    #[test]
    fn flat_position_keeps_equity() {
        let closes: Vec<f64> = (0..30).map(|i| 200.0 - i as f64).collect();
        let s = Strategy::Momentum { lookback: 20 };
        let result = run_backtest(&closes, &s, TRADING_DAYS_PER_YEAR);
        assert!(result.equity_curve.iter().all(|&e| e == 1.0));
        let m = result.metrics.unwrap();
        assert_eq!(m.sharpe, 0.0);
        assert_eq!(m.maxdd, 0.0);
    }

    #[test]
    fn alternating_prices_momentum_is_bounded() {
        let closes: Vec<f64> = (0..60)
            .map(|i| if i % 2 == 0 { 100.0 } else { 90.0 })
            .collect();
        let s = Strategy::Momentum { lookback: 20 };
        let result = run_backtest(&closes, &s, TRADING_DAYS_PER_YEAR);

        assert_eq!(result.equity_curve.len(), 60);
        assert!(result.equity_curve.iter().all(|e| e.is_finite() && *e > 0.0));
        let m = result.metrics.unwrap();
        assert!(m.sharpe.is_finite());
        assert!(m.maxdd <= 0.0);
    }

    #[test]
    fn zero_prior_close_uses_unit_denominator() {
        let s = Strategy::Momentum { lookback: 1 };
        // bar 2: momentum (0 - 1)/1 < 0 -> flat; bar 3: (2 - 0)/1 > 0 -> long.
        let result = run_backtest(&[1.0, 0.0, 2.0], &s, TRADING_DAYS_PER_YEAR);
        assert!(result.equity_curve.iter().all(|e| e.is_finite()));
        assert_relative_eq!(result.equity_curve[2], 1.0 * (1.0 + 2.0));
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let cfg: BacktestConfig = serde_json::from_value(json!({"symbols": ["AAPL", "MSFT"]})).unwrap();
        assert_eq!(cfg.primary_symbol(), Some("AAPL"));
        assert_eq!(cfg.strategy, StrategyKind::MaCrossover);
        assert_eq!(cfg.build_strategy().unwrap(), Strategy::MaCrossover { fast: 20, slow: 50 });
    }

    #[test]
    fn config_without_symbols() {
        let cfg: BacktestConfig = serde_json::from_value(json!({})).unwrap();
        assert_eq!(cfg.primary_symbol(), None);

        let cfg: BacktestConfig = serde_json::from_value(json!({"symbols": ["  "]})).unwrap();
        assert_eq!(cfg.primary_symbol(), None);
    }

    #[test]
    fn config_rejects_unknown_strategy() {
        let res: Result<BacktestConfig, _> =
            serde_json::from_value(json!({"symbols": ["X"], "strategy": "pairs"}));
        assert!(res.is_err());
    }

    proptest! {
        #[test]
        fn equity_curve_matches_input_length(
            closes in prop::collection::vec(1.0f64..1_000.0, 1..150),
            fast in 1usize..30,
            slow in 1usize..60,
        ) {
            let s = Strategy::ma_crossover(fast, slow).unwrap();
            let result = run_backtest(&closes, &s, TRADING_DAYS_PER_YEAR);
            prop_assert_eq!(result.equity_curve.len(), closes.len());
            prop_assert_eq!(result.equity_curve[0], 1.0);
            let m = result.metrics.unwrap();
            prop_assert!(m.maxdd <= 0.0);
            prop_assert!(m.sharpe.is_finite());
        }

        #[test]
        fn maxdd_zero_iff_non_decreasing(closes in prop::collection::vec(1.0f64..1_000.0, 2..100)) {
            let s = Strategy::Momentum { lookback: 3 };
            let result = run_backtest(&closes, &s, TRADING_DAYS_PER_YEAR);
            let non_decreasing = result.equity_curve.windows(2).all(|w| w[1] >= w[0]);
            prop_assert_eq!(result.metrics.unwrap().maxdd == 0.0, non_decreasing);
        }
    }
}
