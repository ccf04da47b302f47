//! Feature extraction for the most recent point of a close series.

use serde::Serialize;

use crate::domain::indicator::{compute_indicators, IndicatorType, DEFAULT_RSI_PERIOD};
use crate::domain::returns::{lagged_returns, population_stddev, simple_return};

pub const MOMENTUM_WINDOW: usize = 20;
/// Extra history requested beyond `days` so long windows are warmed up.
pub const WARMUP_POINTS: usize = 60;

/// History to request for a `days`-point feature window.
pub fn feature_lookback(days: usize) -> usize {
    days.saturating_add(WARMUP_POINTS)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureSet {
    pub ret1: f64,
    pub ret5: f64,
    pub ret20: f64,
    pub vol: f64,
    pub sma20: f64,
    pub ema50: f64,
    pub momentum: f64,
    pub rsi: f64,
}

impl FeatureSet {
    pub const NAMES: [&'static str; 8] = [
        "ret1", "ret5", "ret20", "vol", "sma20", "ema50", "momentum", "rsi",
    ];

    pub fn get(&self, name: &str) -> Option<f64> {
        let value = match name {
            "ret1" => self.ret1,
            "ret5" => self.ret5,
            "ret20" => self.ret20,
            "vol" => self.vol,
            "sma20" => self.sma20,
            "ema50" => self.ema50,
            "momentum" => self.momentum,
            "rsi" => self.rsi,
            _ => return None,
        };
        Some(value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        Self::NAMES
            .iter()
            .filter_map(move |&name| self.get(name).map(|v| (name, v)))
    }
}

/// Features at the last close. `None` when there is no history.
///
/// `days` bounds the volatility window; the whole series is used when shorter.
pub fn extract_features(closes: &[f64], days: usize) -> Option<FeatureSet> {
    let last = closes.len().checked_sub(1)?;

    let ret1 = lagged_returns(closes, 1);
    let vol_window = if ret1.len() >= days {
        &ret1[ret1.len() - days..]
    } else {
        &ret1[..]
    };

    let indicators = compute_indicators(
        closes,
        &[
            IndicatorType::Sma(20),
            IndicatorType::Ema(50),
            IndicatorType::Rsi(DEFAULT_RSI_PERIOD),
        ],
    );
    let latest = |ty: IndicatorType| indicators.get(&ty).and_then(|s| s.last()).unwrap_or(0.0);

    let base = closes.len() - closes.len().min(MOMENTUM_WINDOW);

    Some(FeatureSet {
        ret1: ret1[last],
        ret5: lagged_returns(closes, 5)[last],
        ret20: lagged_returns(closes, 20)[last],
        vol: population_stddev(vol_window),
        sma20: latest(IndicatorType::Sma(20)),
        ema50: latest(IndicatorType::Ema(50)),
        momentum: simple_return(closes[last], closes[base]),
        rsi: latest(IndicatorType::Rsi(DEFAULT_RSI_PERIOD)),
    })
}
