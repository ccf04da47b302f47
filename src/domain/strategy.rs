//! Strategy selection, parameter validation and per-bar signal generation.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::error::EngineError;
use crate::domain::indicator::calculate_sma;
use crate::domain::position::Position;
use crate::domain::returns::lagged_returns;

pub const DEFAULT_FAST: usize = 20;
pub const DEFAULT_SLOW: usize = 50;
pub const DEFAULT_MOMENTUM_LOOKBACK: usize = 20;
/// Upper bound for any window parameter (fast, slow, lookback).
pub const MAX_WINDOW: usize = 100_000;

/// Strategy-specific parameters as supplied by the caller, e.g. `{"fast": 10}`.
pub type StrategyParams = BTreeMap<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum StrategyKind {
    #[default]
    MaCrossover,
    Momentum,
}

impl FromStr for StrategyKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ma_crossover" => Ok(StrategyKind::MaCrossover),
            "momentum" => Ok(StrategyKind::Momentum),
            other => Err(EngineError::UnknownStrategy(other.to_string())),
        }
    }
}

impl TryFrom<String> for StrategyKind {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::MaCrossover => write!(f, "ma_crossover"),
            StrategyKind::Momentum => write!(f, "momentum"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// LONG while SMA(fast) >= SMA(slow).
    MaCrossover { fast: usize, slow: usize },
    /// LONG while the `lookback`-bar return is positive.
    Momentum { lookback: usize },
}

impl Strategy {
    pub fn from_params(kind: StrategyKind, params: &StrategyParams) -> Result<Self, EngineError> {
        match kind {
            StrategyKind::MaCrossover => Ok(Strategy::MaCrossover {
                fast: window_param(params, "fast", DEFAULT_FAST)?,
                slow: window_param(params, "slow", DEFAULT_SLOW)?,
            }),
            StrategyKind::Momentum => Ok(Strategy::Momentum {
                lookback: window_param(params, "lookback", DEFAULT_MOMENTUM_LOOKBACK)?,
            }),
        }
    }

    pub fn ma_crossover(fast: usize, slow: usize) -> Result<Self, EngineError> {
        check_window("fast", fast)?;
        check_window("slow", slow)?;
        Ok(Strategy::MaCrossover { fast, slow })
    }

    pub fn kind(&self) -> StrategyKind {
        match self {
            Strategy::MaCrossover { .. } => StrategyKind::MaCrossover,
            Strategy::Momentum { .. } => StrategyKind::Momentum,
        }
    }

    /// Position held over each bar. Bar 0 never trades and is always FLAT.
    pub fn signals(&self, closes: &[f64]) -> Vec<Position> {
        let mut positions = Vec::with_capacity(closes.len());
        if closes.is_empty() {
            return positions;
        }
        positions.push(Position::Flat);

        match *self {
            Strategy::MaCrossover { fast, slow } => {
                let fasts = calculate_sma(closes, fast);
                let slows = calculate_sma(closes, slow);
                for i in 1..closes.len() {
                    let long = match (fasts.get(i), slows.get(i)) {
                        (Some(f), Some(s)) => f >= s,
                        _ => false,
                    };
                    positions.push(Position::from_signal(long));
                }
            }
            Strategy::Momentum { lookback } => {
                let momentum = lagged_returns(closes, lookback);
                for m in momentum.iter().skip(1) {
                    positions.push(Position::from_signal(*m > 0.0));
                }
            }
        }

        positions
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::MaCrossover { fast, slow } => write!(f, "ma_crossover({fast},{slow})"),
            Strategy::Momentum { lookback } => write!(f, "momentum({lookback})"),
        }
    }
}

/// Read a window-sized integer parameter. Missing keys fall back to `default`;
/// numbers are truncated toward zero and integer strings are accepted.
/// Values must lie in `1..=MAX_WINDOW`.
pub fn window_param(
    params: &StrategyParams,
    name: &str,
    default: usize,
) -> Result<usize, EngineError> {
    let value = match params.get(name) {
        None => return Ok(default),
        Some(v) => v,
    };

    let number = match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| EngineError::invalid_param(name, "not a finite number"))?,
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map(|n| n as f64)
            .map_err(|_| EngineError::invalid_param(name, format!("{s:?} is not an integer")))?,
        other => {
            return Err(EngineError::invalid_param(
                name,
                format!("expected a number, got {other}"),
            ));
        }
    };

    if !number.is_finite() {
        return Err(EngineError::invalid_param(name, "not a finite number"));
    }
    let truncated = number.trunc();
    if truncated < 1.0 {
        return Err(EngineError::invalid_param(name, "must be at least 1"));
    }
    if truncated > MAX_WINDOW as f64 {
        return Err(EngineError::invalid_param(
            name,
            format!("must be at most {MAX_WINDOW}"),
        ));
    }
    Ok(truncated as usize)
}

pub fn check_window(name: &str, value: usize) -> Result<(), EngineError> {
    if value == 0 {
        return Err(EngineError::invalid_param(name, "must be at least 1"));
    }
    if value > MAX_WINDOW {
        return Err(EngineError::invalid_param(
            name,
            format!("must be at most {MAX_WINDOW}"),
        ));
    }
    Ok(())
}
