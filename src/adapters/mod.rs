//! Concrete adapter implementations for ports.

pub mod csv_adapter;
pub mod file_config_adapter;
#[cfg(feature = "http")]
pub mod http_history_adapter;
#[cfg(feature = "web")]
pub mod web;
