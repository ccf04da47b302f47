//! Core domain types and pure computations.

pub mod backtest;
pub mod config_validation;
pub mod error;
pub mod features;
pub mod indicator;
pub mod metrics;
pub mod position;
pub mod prediction;
pub mod returns;
pub mod service;
pub mod strategy;
pub mod walk_forward;
