//! Price history access port.

/// Source of closing prices for a symbol.
///
/// Implementations never fail: any transport, lookup or parse problem yields an
/// empty sequence, which the engine treats uniformly as "no history".
pub trait HistoryPort {
    /// Up to `lookback_days` most recent closes, oldest first.
    fn fetch_history(&self, symbol: &str, lookback_days: usize) -> Vec<f64>;
}

/// Ticker symbols are ASCII letters, digits and `.`, `_`, `^`, `-`, e.g. `BRK.B` or `^GSPC`.
/// Anything else (path separators, `..`, URL syntax) is treated as having no history.
pub fn is_valid_symbol(symbol: &str) -> bool {
    !symbol.is_empty()
        && !symbol.contains("..")
        && symbol
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '^' | '-'))
}

/// Keep only the most recent `lookback_days` closes.
pub fn tail(mut closes: Vec<f64>, lookback_days: usize) -> Vec<f64> {
    if closes.len() > lookback_days {
        closes.drain(..closes.len() - lookback_days);
    }
    closes
}
