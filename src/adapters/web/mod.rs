//! JSON HTTP API over [`ForecastService`].
//!
//! Every response is an envelope: `{"ok": true, "data": ...}` on success and
//! `{"ok": false, "error": "..."}` otherwise.

mod error;
mod handlers;

pub use error::WebError;
pub use handlers::*;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::domain::service::ForecastService;

pub struct AppState {
    pub service: ForecastService,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/features", get(handlers::features))
        .route("/predict/{symbol}", post(handlers::predict))
        .route("/backtest", post(handlers::run_backtest))
        .route("/backtest/{id}", get(handlers::get_backtest))
        .route("/walkforward/{symbol}", post(handlers::walk_forward))
        .route("/models", get(handlers::list_models))
        .route("/models/{id}", get(handlers::get_model))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}
