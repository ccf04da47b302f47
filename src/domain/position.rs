//! Binary position held by the backtest engine.

use serde::Serialize;

/// All-in or all-out. No shorting, no partial sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Position {
    #[default]
    Flat,
    Long,
}

impl Position {
    pub fn from_signal(long: bool) -> Self {
        if long { Position::Long } else { Position::Flat }
    }

    pub fn is_long(&self) -> bool {
        matches!(self, Position::Long)
    }

    /// Fraction of the bar return captured while holding this position.
    pub fn exposure(&self) -> f64 {
        match self {
            Position::Flat => 0.0,
            Position::Long => 1.0,
        }
    }
}
