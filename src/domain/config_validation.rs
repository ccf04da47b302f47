//! Configuration validation.
//!
//! Validates every config field before any command runs. All keys are optional;
//! only values that are present and malformed are rejected.

use std::net::SocketAddr;

use crate::domain::error::EngineError;
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_LISTEN: &str = "127.0.0.1:8001";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistorySource {
    Http,
    Csv,
}

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), EngineError> {
    let source = history_source(config)?;
    validate_timeout(config)?;
    match source {
        HistorySource::Http => validate_base_url(config)?,
        HistorySource::Csv => validate_csv_dir(config)?,
    }
    validate_periods_per_year(config)?;
    listen_addr(config)?;
    Ok(())
}

pub fn history_source(config: &dyn ConfigPort) -> Result<HistorySource, EngineError> {
    let source = config.get_string_or("history", "source", "http");
    match source.to_lowercase().as_str() {
        "http" => Ok(HistorySource::Http),
        "csv" => Ok(HistorySource::Csv),
        other => Err(EngineError::ConfigInvalid {
            section: "history".to_string(),
            key: "source".to_string(),
            reason: format!("unknown source {:?}, expected http or csv", other),
        }),
    }
}

fn validate_base_url(config: &dyn ConfigPort) -> Result<(), EngineError> {
    let Some(url) = config.get_string("history", "base_url") else {
        return Ok(());
    };
    let url = url.trim();
    if url.starts_with("http://") || url.starts_with("https://") {
        return Ok(());
    }
    Err(EngineError::ConfigInvalid {
        section: "history".to_string(),
        key: "base_url".to_string(),
        reason: format!("{:?} is not an http(s) URL", url),
    })
}

fn validate_timeout(config: &dyn ConfigPort) -> Result<(), EngineError> {
    let value = config.get_int("history", "timeout_secs", 10);
    if value <= 0 {
        return Err(EngineError::ConfigInvalid {
            section: "history".to_string(),
            key: "timeout_secs".to_string(),
            reason: "timeout_secs must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_csv_dir(config: &dyn ConfigPort) -> Result<(), EngineError> {
    match config.get_string("history", "csv_dir") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(EngineError::ConfigMissing {
            section: "history".to_string(),
            key: "csv_dir".to_string(),
        }),
    }
}

fn validate_periods_per_year(config: &dyn ConfigPort) -> Result<(), EngineError> {
    let value = config.get_double("engine", "periods_per_year", 252.0);
    if !value.is_finite() || value <= 0.0 {
        return Err(EngineError::ConfigInvalid {
            section: "engine".to_string(),
            key: "periods_per_year".to_string(),
            reason: "periods_per_year must be positive".to_string(),
        });
    }
    Ok(())
}

pub fn listen_addr(config: &dyn ConfigPort) -> Result<SocketAddr, EngineError> {
    let listen = config.get_string_or("web", "listen", DEFAULT_LISTEN);
    listen.parse().map_err(|_| EngineError::ConfigInvalid {
        section: "web".to_string(),
        key: "listen".to_string(),
        reason: format!("{:?} is not a socket address", listen),
    })
}
