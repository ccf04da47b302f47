//! Two-moving-average direction heuristic.
//!
//! Not a forecast model: the direction is SMA(20) vs SMA(50) at the latest close,
//! and the confidence is a fixed constant per direction.

use serde::Serialize;

use crate::domain::indicator::calculate_sma;

pub const MODEL_ID: &str = "sma_crossover";
pub const FAST_WINDOW: usize = 20;
pub const SLOW_WINDOW: usize = 50;
pub const STEP_PER_HORIZON: f64 = 0.002;
pub const MIN_HORIZON: i64 = 1;
pub const MAX_HORIZON: i64 = 5;
pub const UP_CONFIDENCE: f64 = 0.55;
pub const DOWN_CONFIDENCE: f64 = 0.45;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn sign(&self) -> f64 {
        match self {
            Direction::Up => 1.0,
            Direction::Down => -1.0,
        }
    }

    pub fn confidence(&self) -> f64 {
        match self {
            Direction::Up => UP_CONFIDENCE,
            Direction::Down => DOWN_CONFIDENCE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    pub direction: Direction,
    pub price: f64,
    pub confidence: f64,
}

pub fn clamp_horizon(horizon: i64) -> i64 {
    horizon.clamp(MIN_HORIZON, MAX_HORIZON)
}

/// `None` when there is no history.
pub fn predict(closes: &[f64], horizon: i64) -> Option<Prediction> {
    let last_close = *closes.last()?;
    let fast = calculate_sma(closes, FAST_WINDOW).last()?;
    let slow = calculate_sma(closes, SLOW_WINDOW).last()?;

    let direction = if fast >= slow {
        Direction::Up
    } else {
        Direction::Down
    };
    let steps = clamp_horizon(horizon) as f64;
    let price = last_close * (1.0 + STEP_PER_HORIZON * direction.sign() * steps);

    Some(Prediction {
        direction,
        price,
        confidence: direction.confidence(),
    })
}
