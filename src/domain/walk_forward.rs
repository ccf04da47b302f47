//! Walk-forward evaluation of a fixed MA crossover across contiguous time folds.
//!
//! There is no parameter search: the same fast/slow windows run independently on
//! every fold, and the per-fold metrics are averaged.

use serde::Serialize;

use crate::domain::backtest::run_backtest;
use crate::domain::error::EngineError;
use crate::domain::metrics::Metrics;
use crate::domain::strategy::{
    window_param, Strategy, StrategyParams, DEFAULT_FAST, DEFAULT_SLOW,
};

pub const DEFAULT_FOLDS: usize = 5;
pub const MIN_FOLD_SIZE: usize = 50;
/// Points required beyond `slow` before any fold is attempted.
pub const MIN_EXTRA_POINTS: usize = 50;
/// Points required beyond `slow` for a single fold to be kept.
pub const MIN_FOLD_EXTRA_POINTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkForwardConfig {
    pub folds: usize,
    pub fast: usize,
    pub slow: usize,
}

impl Default for WalkForwardConfig {
    fn default() -> Self {
        Self {
            folds: DEFAULT_FOLDS,
            fast: DEFAULT_FAST,
            slow: DEFAULT_SLOW,
        }
    }
}

impl WalkForwardConfig {
    pub fn from_params(folds: Option<usize>, params: &StrategyParams) -> Result<Self, EngineError> {
        let folds = folds.unwrap_or(DEFAULT_FOLDS);
        if folds == 0 {
            return Err(EngineError::invalid_param("folds", "must be at least 1"));
        }
        Ok(Self {
            folds,
            fast: window_param(params, "fast", DEFAULT_FAST)?,
            slow: window_param(params, "slow", DEFAULT_SLOW)?,
        })
    }

    pub fn min_points(&self) -> usize {
        self.slow.saturating_add(MIN_EXTRA_POINTS)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Fold {
    /// 1-based fold index.
    pub fold: usize,
    pub start: usize,
    pub end: usize,
    pub metrics: Metrics,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WalkForwardReport {
    pub folds: Vec<Fold>,
    pub avg: Metrics,
}

impl WalkForwardReport {
    pub fn empty() -> Self {
        Self {
            folds: Vec::new(),
            avg: Metrics::default(),
        }
    }
}

/// Half-open `[start, end)` spans in fold order, before any are skipped.
/// Spans that would start at or past `len` are not produced.
pub fn fold_spans(len: usize, folds: usize) -> Vec<(usize, usize)> {
    if folds == 0 {
        return Vec::new();
    }
    let fold_size = MIN_FOLD_SIZE.max(len / folds);
    (0..folds)
        .map_while(|i| {
            let start = i.checked_mul(fold_size).filter(|&start| start < len)?;
            Some((start, len.min(start.saturating_add(fold_size))))
        })
        .collect()
}

pub fn run_walk_forward(
    closes: &[f64],
    config: &WalkForwardConfig,
    periods_per_year: f64,
) -> WalkForwardReport {
    if config.folds == 0 || config.fast == 0 || config.slow == 0 {
        return WalkForwardReport::empty();
    }
    if closes.len() < config.min_points() {
        return WalkForwardReport::empty();
    }

    let strategy = Strategy::MaCrossover {
        fast: config.fast,
        slow: config.slow,
    };
    let min_span = config.slow.saturating_add(MIN_FOLD_EXTRA_POINTS);

    let folds: Vec<Fold> = fold_spans(closes.len(), config.folds)
        .into_iter()
        .enumerate()
        .filter(|(_, (start, end))| end.saturating_sub(*start) >= min_span)
        .filter_map(|(i, (start, end))| {
            let result = run_backtest(&closes[start..end], &strategy, periods_per_year);
            result.metrics.map(|metrics| Fold {
                fold: i + 1,
                start,
                end,
                metrics,
            })
        })
        .collect();

    let avg = Metrics::average(folds.iter().map(|f| &f.metrics));
    WalkForwardReport { folds, avg }
}
