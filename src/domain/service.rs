//! Request/response surface over the engine.
//!
//! Each operation fetches history through the [`HistoryPort`], runs the pure
//! computations and wraps the outcome in a serializable response. Missing history
//! is reported in the response body, never as an error.

use std::sync::Arc;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::domain::backtest::{run_backtest, BacktestConfig};
use crate::domain::error::EngineError;
use crate::domain::features::{extract_features, feature_lookback, FeatureSet};
use crate::domain::metrics::{Metrics, TRADING_DAYS_PER_YEAR};
use crate::domain::prediction::{self, MODEL_ID};
use crate::domain::strategy::StrategyParams;
use crate::domain::walk_forward::{run_walk_forward, WalkForwardConfig, WalkForwardReport};
use crate::ports::config_port::ConfigPort;
use crate::ports::history_port::HistoryPort;

pub const NO_HISTORY: &str = "no history";
pub const DEFAULT_FEATURE_DAYS: usize = 60;
pub const DEFAULT_HORIZON: i64 = 1;
pub const PREDICT_LOOKBACK: usize = 200;
pub const BACKTEST_LOOKBACK: usize = 400;
pub const WALK_FORWARD_LOOKBACK: usize = 800;
/// Results are not persisted, so every backtest shares this identifier.
pub const PLACEHOLDER_BACKTEST_ID: &str = "bt-0001";
pub const STATUS_DONE: &str = "done";

#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self { ok: true, data }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeaturesResponse {
    pub symbol: String,
    pub days: usize,
    pub features: Option<FeatureSet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictResponse {
    pub symbol: String,
    pub horizon: i64,
    pub prediction: Option<f64>,
    pub confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BacktestResponse {
    pub id: String,
    pub status: String,
    #[serde(serialize_with = "metrics_or_empty")]
    pub metrics: Option<Metrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equity: Option<Vec<f64>>,
}

impl BacktestResponse {
    fn done(metrics: Option<Metrics>, equity: Vec<f64>) -> Self {
        Self {
            id: PLACEHOLDER_BACKTEST_ID.to_string(),
            status: STATUS_DONE.to_string(),
            metrics,
            equity: Some(equity),
        }
    }
}

/// Absent metrics serialize as `{}` rather than `null`.
fn metrics_or_empty<S: Serializer>(metrics: &Option<Metrics>, s: S) -> Result<S::Ok, S::Error> {
    match metrics {
        Some(m) => m.serialize(s),
        None => s.serialize_map(Some(0))?.end(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelInfo {
    pub id: String,
    #[serde(rename = "type")]
    pub model_type: String,
    pub version: String,
}

impl ModelInfo {
    fn sma(id: &str) -> Self {
        Self {
            id: id.to_string(),
            model_type: "sma".to_string(),
            version: "0.0.1".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineSettings {
    /// Annualization factor for the Sharpe ratio.
    pub periods_per_year: f64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            periods_per_year: TRADING_DAYS_PER_YEAR,
        }
    }
}

impl EngineSettings {
    pub fn from_config(config: &dyn ConfigPort) -> Self {
        Self {
            periods_per_year: config.get_double("engine", "periods_per_year", TRADING_DAYS_PER_YEAR),
        }
    }
}

#[derive(Clone)]
pub struct ForecastService {
    history: Arc<dyn HistoryPort + Send + Sync>,
    settings: EngineSettings,
}

impl ForecastService {
    pub fn new(history: Arc<dyn HistoryPort + Send + Sync>, settings: EngineSettings) -> Self {
        Self { history, settings }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn get_features(&self, symbol: &str, days: usize) -> Result<FeaturesResponse, EngineError> {
        if days == 0 {
            return Err(EngineError::invalid_param("days", "must be at least 1"));
        }

        let closes = self.history.fetch_history(symbol, feature_lookback(days));
        tracing::info!(symbol, days, points = closes.len(), "computing features");

        let features = extract_features(&closes, days);
        Ok(FeaturesResponse {
            symbol: symbol.to_string(),
            days,
            note: features.is_none().then(|| NO_HISTORY.to_string()),
            features,
        })
    }

    pub fn predict(&self, symbol: &str, horizon: i64) -> PredictResponse {
        let closes = self.history.fetch_history(symbol, PREDICT_LOOKBACK);
        tracing::info!(symbol, horizon, points = closes.len(), "predicting");

        match prediction::predict(&closes, horizon) {
            Some(p) => PredictResponse {
                symbol: symbol.to_string(),
                horizon,
                prediction: Some(p.price),
                confidence: p.confidence,
                model: Some(MODEL_ID.to_string()),
                note: None,
            },
            None => PredictResponse {
                symbol: symbol.to_string(),
                horizon,
                prediction: None,
                confidence: 0.0,
                model: None,
                note: Some(NO_HISTORY.to_string()),
            },
        }
    }

    pub fn run_backtest(&self, config: &BacktestConfig) -> Result<BacktestResponse, EngineError> {
        let strategy = config.build_strategy()?;

        let Some(symbol) = config.primary_symbol() else {
            tracing::info!("backtest requested without symbols");
            return Ok(BacktestResponse::done(None, Vec::new()));
        };
        if config.symbols.len() > 1 {
            tracing::warn!(
                symbol,
                ignored = config.symbols.len() - 1,
                "only the first symbol is backtested"
            );
        }

        let closes = self.history.fetch_history(symbol, BACKTEST_LOOKBACK);
        tracing::info!(symbol, %strategy, points = closes.len(), "running backtest");

        let result = run_backtest(&closes, &strategy, self.settings.periods_per_year);
        Ok(BacktestResponse::done(result.metrics, result.equity_curve))
    }

    /// Results are not stored; any id reports a finished run with zeroed metrics.
    pub fn get_backtest(&self, id: &str) -> BacktestResponse {
        BacktestResponse {
            id: id.to_string(),
            status: STATUS_DONE.to_string(),
            metrics: Some(Metrics::default()),
            equity: None,
        }
    }

    pub fn run_walk_forward(
        &self,
        symbol: &str,
        folds: Option<usize>,
        params: &StrategyParams,
    ) -> Result<WalkForwardReport, EngineError> {
        let config = WalkForwardConfig::from_params(folds, params)?;

        let closes = self.history.fetch_history(symbol, WALK_FORWARD_LOOKBACK);
        tracing::info!(
            symbol,
            folds = config.folds,
            fast = config.fast,
            slow = config.slow,
            points = closes.len(),
            "running walk-forward"
        );
        if closes.len() < config.min_points() {
            tracing::info!(symbol, needed = config.min_points(), "not enough history for walk-forward");
        }

        Ok(run_walk_forward(&closes, &config, self.settings.periods_per_year))
    }

    pub fn list_models(&self) -> Vec<ModelInfo> {
        vec![ModelInfo::sma("baseline")]
    }

    /// Every id resolves to an SMA model descriptor.
    pub fn get_model(&self, id: &str) -> ModelInfo {
        ModelInfo::sma(id)
    }
}
