//! # ML Wave Forecast
//!
//! Synthetic sine-wave sequence forecasting with an LSTM, watched live from a
//! terminal dashboard built with Ratatui. The network trains on sliding
//! windows of generated waves via the Burn ML framework and predicts each
//! wave's next value.
//!
//! ## Modules
//!
//! - [`wave`] — Synthetic sequence generation: parameters, sampling, pools
//! - [`dataset`] — Window/target extraction and tensor batch assembly
//! - [`predictor`] — LSTM regression model, training loop, prediction
//! - [`training`] — Run orchestration, progress reporting, loss history
//! - [`viz`] — Plot scene construction: waves, loss curves, evaluation
//! - [`ui`] — Terminal UI: application shell, dashboard, canvas renderer
//! - [`config`] — TOML configuration loading and validation
//! - [`error`] — Structured error types

#![recursion_limit = "256"]

pub mod config;
pub mod dataset;
pub mod error;
pub mod predictor;
pub mod training;
pub mod ui;
pub mod viz;
pub mod wave;
