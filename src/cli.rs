//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use crate::adapters::csv_adapter::CsvHistoryAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::BacktestConfig;
use crate::domain::config_validation::{history_source, validate_config, HistorySource};
use crate::domain::error::EngineError;
use crate::domain::service::{
    ApiResponse, EngineSettings, ForecastService, DEFAULT_FEATURE_DAYS, DEFAULT_HORIZON,
};
use crate::domain::strategy::{StrategyKind, StrategyParams};
use crate::ports::config_port::ConfigPort;
use crate::ports::history_port::HistoryPort;

#[derive(Parser, Debug)]
#[command(
    name = "trendcast",
    about = "Indicators, direction heuristic and long/flat backtests over daily closes"
)]
pub struct Cli {
    /// INI config file; all settings fall back to defaults when omitted
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override [history] base_url
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Read closes from {dir}/{SYMBOL}.csv instead of the HTTP history server
    #[arg(long, global = true)]
    pub csv_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute the feature set for a symbol
    Features {
        symbol: String,
        #[arg(long, default_value_t = DEFAULT_FEATURE_DAYS)]
        days: usize,
    },
    /// Predict the close `horizon` bars ahead
    Predict {
        symbol: String,
        #[arg(long, default_value_t = DEFAULT_HORIZON, allow_hyphen_values = true)]
        horizon: i64,
    },
    /// Run a long/flat backtest
    Backtest {
        /// Symbol to test; only the first one is used
        #[arg(short, long = "symbol", required = true)]
        symbols: Vec<String>,
        #[arg(long, default_value = "ma_crossover")]
        strategy: String,
        /// Strategy parameter as KEY=VALUE, e.g. fast=10
        #[arg(short, long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,
    },
    /// Evaluate an MA crossover across sequential folds
    WalkForward {
        symbol: String,
        #[arg(long)]
        folds: Option<usize>,
        #[arg(short, long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,
    },
    /// List models, or describe one
    Models { id: Option<String> },
    /// Start the HTTP API
    Serve {
        /// Override [web] listen
        #[arg(long)]
        listen: Option<String>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    init_logging();

    match try_run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn try_run(cli: Cli) -> Result<(), EngineError> {
    let mut config = load_config(cli.config.as_deref())?;
    apply_overrides(&mut config, cli.base_url.as_deref(), cli.csv_dir.as_deref());
    if let Command::Serve {
        listen: Some(listen),
    } = &cli.command
    {
        config.set("web", "listen", listen);
    }
    validate_config(&config)?;

    let service = build_service(&config)?;
    match cli.command {
        Command::Serve { .. } => serve(&config, service),
        command => {
            let output = execute(command, &service)?;
            let text = serde_json::to_string_pretty(&output)
                .map_err(|e| EngineError::Io(std::io::Error::other(e)))?;
            println!("{text}");
            Ok(())
        }
    }
}

/// Logs go to stderr so stdout carries only the JSON result.
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    // Already installed when run more than once in a process.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn load_config(path: Option<&Path>) -> Result<FileConfigAdapter, EngineError> {
    let Some(path) = path else {
        return Ok(FileConfigAdapter::empty());
    };
    tracing::info!(path = %path.display(), "loading config");
    FileConfigAdapter::from_file(path).map_err(|e| EngineError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

pub fn apply_overrides(config: &mut FileConfigAdapter, base_url: Option<&str>, csv_dir: Option<&Path>) {
    if let Some(url) = base_url {
        config.set("history", "base_url", url);
    }
    if let Some(dir) = csv_dir {
        config.set("history", "source", "csv");
        config.set("history", "csv_dir", &dir.display().to_string());
    }
}

pub fn build_history_port(
    config: &dyn ConfigPort,
) -> Result<Arc<dyn HistoryPort + Send + Sync>, EngineError> {
    match history_source(config)? {
        HistorySource::Csv => {
            let dir = config
                .get_string("history", "csv_dir")
                .ok_or_else(|| EngineError::ConfigMissing {
                    section: "history".to_string(),
                    key: "csv_dir".to_string(),
                })?;
            tracing::info!(dir = %dir.trim(), "reading history from csv");
            Ok(Arc::new(CsvHistoryAdapter::new(PathBuf::from(dir.trim()))))
        }
        #[cfg(feature = "http")]
        HistorySource::Http => {
            use crate::adapters::http_history_adapter::HttpHistoryAdapter;
            Ok(Arc::new(HttpHistoryAdapter::from_config(config)?))
        }
        #[cfg(not(feature = "http"))]
        HistorySource::Http => Err(EngineError::ConfigInvalid {
            section: "history".to_string(),
            key: "source".to_string(),
            reason: "built without the http feature".to_string(),
        }),
    }
}

pub fn build_service(config: &dyn ConfigPort) -> Result<ForecastService, EngineError> {
    let history = build_history_port(config)?;
    Ok(ForecastService::new(history, EngineSettings::from_config(config)))
}

/// Parse `KEY=VALUE`. Values that read as JSON keep their type; anything else is a string.
pub fn parse_param(raw: &str) -> Result<(String, Value), EngineError> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| EngineError::invalid_param(raw, "expected KEY=VALUE"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(EngineError::invalid_param(raw, "empty parameter name"));
    }
    let value = value.trim();
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

pub fn parse_params(raw: &[String]) -> Result<StrategyParams, EngineError> {
    raw.iter().map(|p| parse_param(p)).collect()
}

fn envelope<T: Serialize>(data: T) -> Result<Value, EngineError> {
    serde_json::to_value(ApiResponse::ok(data)).map_err(|e| EngineError::Io(std::io::Error::other(e)))
}

/// Run a non-server command and return its JSON envelope.
pub fn execute(command: Command, service: &ForecastService) -> Result<Value, EngineError> {
    match command {
        Command::Features { symbol, days } => envelope(service.get_features(&symbol, days)?),
        Command::Predict { symbol, horizon } => envelope(service.predict(&symbol, horizon)),
        Command::Backtest {
            symbols,
            strategy,
            params,
        } => {
            let config = BacktestConfig {
                symbols,
                strategy: strategy.parse::<StrategyKind>()?,
                params: parse_params(&params)?,
                ..BacktestConfig::default()
            };
            envelope(service.run_backtest(&config)?)
        }
        Command::WalkForward {
            symbol,
            folds,
            params,
        } => envelope(service.run_walk_forward(&symbol, folds, &parse_params(&params)?)?),
        Command::Models { id: Some(id) } => envelope(service.get_model(&id)),
        Command::Models { id: None } => envelope(service.list_models()),
        Command::Serve { .. } => Err(EngineError::invalid_param("command", "serve has no JSON output")),
    }
}

#[cfg(feature = "web")]
fn serve(config: &dyn ConfigPort, service: ForecastService) -> Result<(), EngineError> {
    use crate::adapters::web::{build_router, AppState};
    use crate::domain::config_validation::listen_addr;

    let addr = listen_addr(config)?;
    let router = build_router(AppState { service });

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("trendcast v{} listening on {}", env!("CARGO_PKG_VERSION"), addr);
        axum::serve(listener, router).await
    })?;
    Ok(())
}

#[cfg(not(feature = "web"))]
fn serve(_config: &dyn ConfigPort, _service: ForecastService) -> Result<(), EngineError> {
    Err(EngineError::ConfigInvalid {
        section: "web".to_string(),
        key: "listen".to_string(),
        reason: "built without the web feature".to_string(),
    })
}
