//! CSV file history adapter.
//!
//! Reads `{dir}/{SYMBOL}.csv` with a header row containing `date` (YYYY-MM-DD) and
//! `close` columns; any other columns are ignored.

use crate::ports::history_port::{is_valid_symbol, tail, HistoryPort};
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvHistoryAdapter {
    base_path: PathBuf,
}

impl CsvHistoryAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol.to_uppercase()))
    }

    fn read_closes(&self, symbol: &str) -> Result<Vec<f64>, String> {
        if !is_valid_symbol(symbol) {
            return Err(format!("invalid symbol {:?}", symbol));
        }
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path)
            .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| format!("CSV header error: {}", e))?
            .clone();
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or_else(|| format!("missing {} column", name))
        };
        let date_col = column("date")?;
        let close_col = column("close")?;

        let mut rows: Vec<(NaiveDate, f64)> = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| format!("CSV parse error: {}", e))?;

            let date_str = record.get(date_col).unwrap_or_default().trim();
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
                .map_err(|e| format!("invalid date {:?}: {}", date_str, e))?;

            let close_str = record.get(close_col).unwrap_or_default().trim();
            let close: f64 = close_str
                .parse()
                .map_err(|e| format!("invalid close value {:?}: {}", close_str, e))?;

            rows.push((date, close));
        }

        rows.sort_by_key(|(date, _)| *date);
        Ok(rows.into_iter().map(|(_, close)| close).collect())
    }
}

impl HistoryPort for CsvHistoryAdapter {
    fn fetch_history(&self, symbol: &str, lookback_days: usize) -> Vec<f64> {
        match self.read_closes(symbol) {
            Ok(closes) => {
                tracing::debug!(symbol, count = closes.len(), "loaded closes from csv");
                tail(closes, lookback_days)
            }
            Err(reason) => {
                tracing::warn!(symbol, %reason, "no csv history");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_data() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();

        let csv_content = "date,open,high,low,close,volume\n\
            2024-01-17,110.0,120.0,105.0,115.0,55000\n\
            2024-01-15,100.0,110.0,90.0,105.0,50000\n\
            2024-01-16,105.0,115.0,100.0,110.0,60000\n";
        fs::write(path.join("AAPL.csv"), csv_content).unwrap();
        fs::write(path.join("MSFT.csv"), "date,close\n2024-01-15,not_a_price\n").unwrap();
        fs::write(path.join("NOCLOSE.csv"), "date,open\n2024-01-15,1.0\n").unwrap();

        (dir, path)
    }

    #[test]
    fn fetch_history_sorted_by_date() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvHistoryAdapter::new(path);
        assert_eq!(adapter.fetch_history("AAPL", 10), vec![105.0, 110.0, 115.0]);
    }

    #[test]
    fn fetch_history_symbol_is_case_insensitive() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvHistoryAdapter::new(path);
        assert_eq!(adapter.fetch_history("aapl", 10).len(), 3);
    }

    #[test]
    fn fetch_history_keeps_most_recent() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvHistoryAdapter::new(path);
        assert_eq!(adapter.fetch_history("AAPL", 2), vec![110.0, 115.0]);
    }

    #[test]
    fn fetch_history_empty_for_missing_file() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvHistoryAdapter::new(path);
        assert!(adapter.fetch_history("XYZ", 10).is_empty());
    }

    #[test]
    fn fetch_history_empty_for_bad_rows() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvHistoryAdapter::new(path);
        assert!(adapter.fetch_history("MSFT", 10).is_empty());
        assert!(adapter.fetch_history("NOCLOSE", 10).is_empty());
    }

    #[test]
    fn fetch_history_rejects_paths_outside_dir() {
        let root = TempDir::new().unwrap();
        fs::write(root.path().join("SECRET.csv"), "date,close\n2024-01-15,42.0\n").unwrap();
        let data_dir = root.path().join("closes");
        fs::create_dir(&data_dir).unwrap();

        let outside = CsvHistoryAdapter::new(root.path().to_path_buf());
        assert_eq!(outside.fetch_history("SECRET", 10), vec![42.0]);

        let adapter = CsvHistoryAdapter::new(data_dir);
        assert!(adapter.fetch_history("../secret", 10).is_empty());
        assert!(adapter.fetch_history("..", 10).is_empty());
        let absolute = root.path().join("SECRET").display().to_string();
        assert!(adapter.fetch_history(&absolute, 10).is_empty());
    }
}
