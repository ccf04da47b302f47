//! INI file configuration adapter.

use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

#[derive(Debug)]
pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut config = Ini::new();
        config.load(path).map_err(std::io::Error::other)?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }

    /// No file given: every lookup falls back to its default.
    pub fn empty() -> Self {
        Self { config: Ini::new() }
    }

    /// Override a single value, e.g. from a command-line flag.
    pub fn set(&mut self, section: &str, key: &str, value: &str) {
        self.config.set(section, key, Some(value.to_string()));
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.config
            .getfloat(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn from_string_parses_config() {
        let content = r#"
[history]
source = http
base_url = http://localhost:4010

[engine]
periods_per_year = 252
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(
            adapter.get_string("history", "base_url"),
            Some("http://localhost:4010".to_string())
        );
        assert_eq!(adapter.get_double("engine", "periods_per_year", 0.0), 252.0);
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string("[history]\nsource = csv\n").unwrap();
        assert_eq!(adapter.get_string("history", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn get_int_returns_value_or_default() {
        let adapter =
            FileConfigAdapter::from_string("[history]\ntimeout_secs = 5\nbad = abc\n").unwrap();
        assert_eq!(adapter.get_int("history", "timeout_secs", 10), 5);
        assert_eq!(adapter.get_int("history", "missing", 42), 42);
        assert_eq!(adapter.get_int("history", "bad", 42), 42);
    }

    #[test]
    fn get_double_returns_default_for_non_numeric() {
        let adapter =
            FileConfigAdapter::from_string("[engine]\nperiods_per_year = weekly\n").unwrap();
        assert_eq!(adapter.get_double("engine", "periods_per_year", 252.0), 252.0);
    }

    #[test]
    fn get_string_or_falls_back_on_blank() {
        let adapter = FileConfigAdapter::from_string("[web]\nlisten =   \n").unwrap();
        assert_eq!(
            adapter.get_string_or("web", "listen", "127.0.0.1:8001"),
            "127.0.0.1:8001"
        );
    }

    #[test]
    fn empty_and_set() {
        let mut adapter = FileConfigAdapter::empty();
        assert_eq!(adapter.get_string("history", "source"), None);
        adapter.set("history", "source", "csv");
        assert_eq!(adapter.get_string("history", "source"), Some("csv".to_string()));
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config("[history]\ncsv_dir = /data/closes\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("history", "csv_dir"),
            Some("/data/closes".to_string())
        );
    }

    #[test]
    fn from_file_returns_error_for_missing_file() {
        assert!(FileConfigAdapter::from_file("/nonexistent/path/config.ini").is_err());
    }
}
