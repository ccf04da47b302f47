#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use trendcast::domain::service::{EngineSettings, ForecastService};
use trendcast::ports::history_port::{tail, HistoryPort};

/// In-memory history keyed by symbol. Records every request for assertions.
pub struct MockHistoryPort {
    pub data: HashMap<String, Vec<f64>>,
    pub requests: Mutex<Vec<(String, usize)>>,
}

impl MockHistoryPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_closes(mut self, symbol: &str, closes: Vec<f64>) -> Self {
        self.data.insert(symbol.to_string(), closes);
        self
    }

    pub fn requested_lookbacks(&self) -> Vec<usize> {
        self.requests.lock().unwrap().iter().map(|(_, n)| *n).collect()
    }
}

impl HistoryPort for MockHistoryPort {
    fn fetch_history(&self, symbol: &str, lookback_days: usize) -> Vec<f64> {
        self.requests
            .lock()
            .unwrap()
            .push((symbol.to_string(), lookback_days));
        tail(self.data.get(symbol).cloned().unwrap_or_default(), lookback_days)
    }
}

pub fn service_with(port: MockHistoryPort) -> (ForecastService, Arc<MockHistoryPort>) {
    let port = Arc::new(port);
    let service = ForecastService::new(port.clone(), EngineSettings::default());
    (service, port)
}

pub fn service_for(symbol: &str, closes: Vec<f64>) -> ForecastService {
    service_with(MockHistoryPort::new().with_closes(symbol, closes)).0
}

/// `n` closes rising by 1 from `start`.
pub fn rising(n: usize, start: f64) -> Vec<f64> {
    (0..n).map(|i| start + i as f64).collect()
}

/// `n` closes falling by 1 from `start`.
pub fn falling(n: usize, start: f64) -> Vec<f64> {
    (0..n).map(|i| start - i as f64).collect()
}

/// Alternating `high`, `low`, `high`, ...
pub fn alternating(n: usize, high: f64, low: f64) -> Vec<f64> {
    (0..n).map(|i| if i % 2 == 0 { high } else { low }).collect()
}

/// Deterministic oscillating series around 100.
pub fn wave(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| 100.0 + 10.0 * (i as f64 / 7.0).sin() + i as f64 * 0.05)
        .collect()
}
