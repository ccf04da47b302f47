//! HTTP request handlers for web adapter.
//!
//! History adapters block, so every handler that touches the service runs it on
//! the blocking pool.

use axum::{
    Json,
    body::Bytes,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

use crate::domain::backtest::BacktestConfig;
use crate::domain::service::{
    ApiResponse, BacktestResponse, DEFAULT_FEATURE_DAYS, DEFAULT_HORIZON, FeaturesResponse,
    ForecastService, ModelInfo, PredictResponse,
};
use crate::domain::strategy::StrategyParams;
use crate::domain::walk_forward::WalkForwardReport;

use super::{AppState, WebError};

type ApiResult<T> = Result<Json<ApiResponse<T>>, WebError>;

async fn with_service<T, F>(state: &AppState, f: F) -> Result<T, WebError>
where
    F: FnOnce(&ForecastService) -> T + Send + 'static,
    T: Send + 'static,
{
    let service = state.service.clone();
    tokio::task::spawn_blocking(move || f(&service))
        .await
        .map_err(|e| WebError::internal(e.to_string()))
}

/// Optional JSON body: an empty body means all defaults.
fn parse_body<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T, WebError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| WebError::bad_request(format!("invalid request body: {e}")))
}

#[derive(Debug, Deserialize)]
pub struct FeaturesQuery {
    pub symbol: Option<String>,
    pub days: Option<usize>,
}

pub async fn features(
    State(state): State<Arc<AppState>>,
    query: Result<Query<FeaturesQuery>, QueryRejection>,
) -> ApiResult<FeaturesResponse> {
    let Query(query) = query?;
    let symbol = query
        .symbol
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| WebError::bad_request("missing query parameter: symbol"))?;
    let days = query.days.unwrap_or(DEFAULT_FEATURE_DAYS);

    let response = with_service(&state, move |svc| svc.get_features(&symbol, days)).await??;
    Ok(Json(ApiResponse::ok(response)))
}

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    #[serde(default = "default_horizon")]
    pub horizon: i64,
}

fn default_horizon() -> i64 {
    DEFAULT_HORIZON
}

impl Default for PredictRequest {
    fn default() -> Self {
        Self {
            horizon: DEFAULT_HORIZON,
        }
    }
}

pub async fn predict(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
    body: Bytes,
) -> ApiResult<PredictResponse> {
    let request: PredictRequest = parse_body(&body)?;
    let response = with_service(&state, move |svc| svc.predict(&symbol, request.horizon)).await?;
    Ok(Json(ApiResponse::ok(response)))
}

pub async fn run_backtest(
    State(state): State<Arc<AppState>>,
    body: Result<Json<BacktestConfig>, JsonRejection>,
) -> ApiResult<BacktestResponse> {
    let Json(config) = body?;
    let response = with_service(&state, move |svc| svc.run_backtest(&config)).await??;
    Ok(Json(ApiResponse::ok(response)))
}

pub async fn get_backtest(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<BacktestResponse> {
    Ok(Json(ApiResponse::ok(state.service.get_backtest(&id))))
}

#[derive(Debug, Default, Deserialize)]
pub struct WalkForwardRequest {
    pub folds: Option<usize>,
    #[serde(default)]
    pub params: StrategyParams,
}

pub async fn walk_forward(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
    body: Bytes,
) -> ApiResult<WalkForwardReport> {
    let request: WalkForwardRequest = parse_body(&body)?;
    let response = with_service(&state, move |svc| {
        svc.run_walk_forward(&symbol, request.folds, &request.params)
    })
    .await??;
    Ok(Json(ApiResponse::ok(response)))
}

pub async fn list_models(State(state): State<Arc<AppState>>) -> ApiResult<Vec<ModelInfo>> {
    Ok(Json(ApiResponse::ok(state.service.list_models())))
}

pub async fn get_model(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<ModelInfo> {
    Ok(Json(ApiResponse::ok(state.service.get_model(&id))))
}

pub async fn not_found() -> WebError {
    WebError::not_found("not found")
}
