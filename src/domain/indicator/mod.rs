//! Technical indicator implementations.
//!
//! Every indicator maps a close series to a series of the same length. There is no
//! truncation for warm-up: early points use a defined fallback instead.
//! - `IndicatorType`: indicator identity + parameters (serves as HashMap key)
//! - `IndicatorSeries`: computed values tagged with their indicator type

pub mod ema;
pub mod rsi;
pub mod sma;

use std::collections::HashMap;
use std::fmt;

pub use ema::calculate_ema;
pub use rsi::{calculate_rsi, DEFAULT_RSI_PERIOD, RSI_NEUTRAL};
pub use sma::calculate_sma;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Ema(usize),
    Rsi(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<f64>,
}

impl IndicatorSeries {
    pub fn empty(indicator_type: IndicatorType) -> Self {
        Self {
            indicator_type,
            values: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// Most recent value.
    pub fn last(&self) -> Option<f64> {
        self.values.last().copied()
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Ema(period) => write!(f, "EMA({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
        }
    }
}

pub fn calculate(closes: &[f64], indicator_type: IndicatorType) -> IndicatorSeries {
    match indicator_type {
        IndicatorType::Sma(period) => calculate_sma(closes, period),
        IndicatorType::Ema(period) => calculate_ema(closes, period),
        IndicatorType::Rsi(period) => calculate_rsi(closes, period),
    }
}

/// Compute each requested indicator once, keyed by its type.
pub fn compute_indicators(
    closes: &[f64],
    indicator_types: &[IndicatorType],
) -> HashMap<IndicatorType, IndicatorSeries> {
    let mut out = HashMap::with_capacity(indicator_types.len());
    for &ty in indicator_types {
        out.entry(ty).or_insert_with(|| calculate(closes, ty));
    }
    out
}
