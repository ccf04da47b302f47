//! HTTP history adapter for the upstream stock server.
//!
//! `GET {base_url}/api/stocks/{symbol}/history` returning
//! `{"data": [{"close": 101.5, ...}, ...]}`, oldest first.

use std::time::Duration;

use serde::Deserialize;

use crate::domain::error::EngineError;
use crate::ports::config_port::ConfigPort;
use crate::ports::history_port::{is_valid_symbol, tail, HistoryPort};

pub const DEFAULT_BASE_URL: &str = "http://localhost:4010";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Deserialize)]
pub struct HistoryEnvelope {
    #[serde(default)]
    pub data: Vec<HistoryRow>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryRow {
    pub close: Option<f64>,
}

impl HistoryEnvelope {
    /// Closes in row order. A row without a close invalidates the whole response.
    pub fn closes(self) -> Result<Vec<f64>, String> {
        self.data
            .into_iter()
            .enumerate()
            .map(|(i, row)| row.close.ok_or_else(|| format!("row {} has no close", i)))
            .collect()
    }
}

pub struct HttpHistoryAdapter {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpHistoryAdapter {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, EngineError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| EngineError::ConfigInvalid {
                section: "history".into(),
                key: "base_url".into(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, EngineError> {
        let base_url = config.get_string_or("history", "base_url", DEFAULT_BASE_URL);
        let timeout = config.get_int("history", "timeout_secs", DEFAULT_TIMEOUT_SECS as i64);
        Self::new(&base_url, Duration::from_secs(timeout.max(1) as u64))
    }

    pub fn history_url(&self, symbol: &str) -> String {
        format!("{}/api/stocks/{}/history", self.base_url, symbol)
    }

    fn request(&self, symbol: &str) -> Result<Vec<f64>, String> {
        if !is_valid_symbol(symbol) {
            return Err(format!("invalid symbol {:?}", symbol));
        }
        let url = self.history_url(symbol);
        let response = self
            .client
            .get(&url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| e.to_string())?;
        let envelope: HistoryEnvelope = response.json().map_err(|e| e.to_string())?;
        envelope.closes()
    }
}

impl HistoryPort for HttpHistoryAdapter {
    fn fetch_history(&self, symbol: &str, lookback_days: usize) -> Vec<f64> {
        match self.request(symbol) {
            Ok(closes) => {
                tracing::debug!(symbol, count = closes.len(), "fetched history");
                tail(closes, lookback_days)
            }
            Err(reason) => {
                tracing::warn!(symbol, %reason, "history fetch failed");
                Vec::new()
            }
        }
    }
}
